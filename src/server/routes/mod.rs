mod categories;
mod play;
mod questions;

use serde::Serialize;

use super::error::ApiError;

pub use categories::{category_router, format_categories};
pub use play::play_router;
pub use questions::questions_router;

pub type ApiResponse<T> = Result<T, ApiError>;

/// Body of mutations that report nothing beyond the outcome.
#[derive(Serialize)]
pub struct Success {
    success: bool,
}

impl Success {
    pub fn new() -> Self {
        Success { success: true }
    }
}

impl Default for Success {
    fn default() -> Self {
        Self::new()
    }
}

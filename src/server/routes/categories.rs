use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{queries::categories::get_all_categories, Category},
    server::{app::AppState, error::ApiError},
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

/// Folds categories into one `{id: type}` mapping; ids become string keys on the wire.
pub fn format_categories(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories
        .into_iter()
        .map(|category| (category.id, category.kind))
        .collect()
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoriesResponse {
        success: true,
        categories: format_categories(categories),
    }))
}

pub fn category_router() -> Router<AppState> {
    Router::new().route("/categories", get(get_categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_fold_into_one_mapping() {
        let mapping = format_categories(vec![
            Category { id: 2, kind: "Art".into() },
            Category { id: 1, kind: "Science".into() },
        ]);
        assert_eq!(
            serde_json::to_value(&mapping).unwrap(),
            serde_json::json!({"1": "Science", "2": "Art"})
        );
    }

    #[test]
    fn no_categories_is_an_empty_mapping() {
        assert!(format_categories(Vec::new()).is_empty());
    }
}

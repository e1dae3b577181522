pub const QUESTIONS_PER_PAGE: usize = 10;

/// Items `[(page - 1) * 10, page * 10)` of an already ordered list, clipped to its length.
///
/// Pages below 1 are empty.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    let Ok(index) = usize::try_from(page - 1) else {
        return &[];
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE).min(items.len());
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}

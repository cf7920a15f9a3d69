/// Errors raised while building or loading an FAQ collection.
///
/// Searching itself never fails; these cover dataset parsing and validation, which
/// happen once per load. Server crates wrap `FaqError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum FaqError {
    #[error("category #{position} has an empty title")]
    EmptyCategoryTitle { position: usize },

    #[error("faq record {id:?} in category {category:?} has an empty {field}")]
    EmptyField {
        category: String,
        id: String,
        field: &'static str,
    },

    #[error("duplicate faq id: {0}")]
    DuplicateId(String),

    #[error("faq dataset json error: {0}")]
    Json(#[from] serde_json::Error),
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::search::{Match, MatchField};
use crate::snippet::HighlightSpan;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchFaqParams {
    /// Free-text query; records containing any whitespace-separated term match.
    pub query: String,
    /// Maximum number of results to return (default: all, max: 50).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFaqParams {
    /// FAQ record ID such as "general-1" or "technical-2".
    pub faq_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCategoryParams {
    /// Category title ("Technical") or key ("technical").
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaqMatch {
    pub field: MatchField,
    /// Escaped snippet HTML; `<mark>` is the only tag it contains.
    pub html: String,
    /// Snippet text without markup or ellipses.
    pub text: String,
    /// Byte spans of `text` to emphasize.
    pub highlights: Vec<HighlightSpan>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

impl From<&Match> for FaqMatch {
    fn from(m: &Match) -> Self {
        Self {
            field: m.field,
            html: m.snippet.to_html(),
            text: m.snippet.text.clone(),
            highlights: m.snippet.highlights.clone(),
            leading_ellipsis: m.snippet.leading_ellipsis,
            trailing_ellipsis: m.snippet.trailing_ellipsis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaqSearchHit {
    pub id: String,
    pub category: String,
    pub question: String,
    pub matches: Vec<FaqMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchFaqResponse {
    pub query: String,
    /// Number of matching records before `limit` is applied.
    pub total: usize,
    /// Human-readable count, e.g. "Found 2 matching results".
    pub summary: String,
    pub results: Vec<FaqSearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaqDetailResponse {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub category_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryInfo {
    pub title: String,
    pub key: Option<String>,
    pub faq_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaqSummary {
    pub id: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub category: CategoryInfo,
    pub faqs: Vec<FaqSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadFaqResponse {
    pub reloaded: bool,
    /// Where the served dataset came from: a file path or "embedded".
    pub source: String,
    pub fingerprint: String,
    pub faq_count: usize,
    pub category_count: usize,
}

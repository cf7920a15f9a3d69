use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Category, FaqRecord};
use crate::snippet::{context_snippet, highlight_occurrences, Snippet};
use crate::terms::SearchTerms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Question,
    Answer,
}

/// One matched field of a record together with its snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub field: MatchField,
    pub snippet: Snippet,
}

/// A record with at least one matched field. Borrowed from the searched categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'a> {
    pub item: &'a FaqRecord,
    /// Question match first when both fields matched.
    pub matches: Vec<Match>,
}

impl SearchResult<'_> {
    pub fn field(&self, field: MatchField) -> Option<&Match> {
        self.matches.iter().find(|m| m.field == field)
    }
}

/// Find every record whose question or answer contains any term of `query`.
///
/// Results keep category order, then record order; there is no ranking. A blank
/// query returns no results. Matched questions are returned whole with every
/// occurrence highlighted; matched answers are cut to a context window.
pub fn search<'a>(query: &str, categories: &'a [Category]) -> Vec<SearchResult<'a>> {
    let terms = SearchTerms::parse(query);
    if terms.is_empty() {
        return Vec::new();
    }

    categories
        .iter()
        .flat_map(|category| category.items.iter())
        .filter_map(|item| match_record(item, &terms))
        .collect()
}

fn match_record<'a>(item: &'a FaqRecord, terms: &SearchTerms) -> Option<SearchResult<'a>> {
    let mut matches = Vec::with_capacity(2);

    if terms.matches(&item.question) {
        matches.push(Match {
            field: MatchField::Question,
            snippet: highlight_occurrences(&item.question, terms),
        });
    }

    if terms.matches(&item.answer) {
        matches.push(Match {
            field: MatchField::Answer,
            snippet: context_snippet(&item.answer, terms),
        });
    }

    (!matches.is_empty()).then_some(SearchResult { item, matches })
}

/// Result-count header shown above search results.
pub fn result_summary(count: usize) -> String {
    let noun = if count == 1 { "result" } else { "results" };
    format!("Found {count} matching {noun}")
}

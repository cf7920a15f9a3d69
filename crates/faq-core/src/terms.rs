use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Lower-cased, whitespace-delimited search terms derived from a query.
///
/// Terms are matched literally: regex metacharacters in the query carry no meaning.
#[derive(Debug, Clone)]
pub struct SearchTerms {
    terms: Vec<String>,
    patterns: Vec<Regex>,
}

impl SearchTerms {
    /// Trim and lower-case `query`, split it on whitespace and drop duplicate terms.
    /// A blank query yields no terms.
    pub fn parse(query: &str) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for term in query.trim().to_lowercase().split_whitespace() {
            if !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }

        let patterns = terms
            .iter()
            .filter_map(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
                    .inspect_err(|e| warn!(error = %e, term, "search term cannot be highlighted"))
                    .ok()
            })
            .collect();

        Self { terms, patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if any term is a case-insensitive substring of `text`.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.terms.iter().any(|term| lower.contains(term.as_str()))
    }

    /// Byte ranges of every case-insensitive occurrence of every term in `text`,
    /// sorted by start. Ranges of different terms may overlap.
    pub(crate) fn occurrences(&self, text: &str) -> Vec<(usize, usize)> {
        let mut found: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_has_no_terms() {
        assert!(SearchTerms::parse("").is_empty());
        assert!(SearchTerms::parse(" \t\n ").is_empty());
    }

    #[test]
    fn splits_lowercases_and_dedups() {
        let terms = SearchTerms::parse("  RSS   feed rss\tFeed ");
        assert_eq!(terms.terms, ["rss", "feed"]);
    }

    #[test]
    fn matches_substrings_case_insensitively() {
        let terms = SearchTerms::parse("CAST");
        assert!(terms.matches("What is this podcast about?"));
        assert!(!terms.matches("How often do you release new episodes?"));
    }

    #[test]
    fn metacharacters_are_literal() {
        let terms = SearchTerms::parse("(48khz,");
        assert!(terms.matches("high-quality audio (48kHz, 24-bit)"));
        assert_eq!(terms.occurrences("audio (48kHz, 24-bit)"), vec![(6, 13)]);

        let dot = SearchTerms::parse(".");
        assert!(dot.occurrences("no dots here").is_empty());
    }

    #[test]
    fn occurrences_cover_all_terms_in_order() {
        let terms = SearchTerms::parse("feed rss");
        assert_eq!(
            terms.occurrences("An RSS feed, rss FEED"),
            vec![(3, 6), (7, 11), (13, 16), (17, 21)]
        );
    }
}

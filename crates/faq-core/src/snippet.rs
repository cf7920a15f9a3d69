/// Snippet construction for matched FAQ fields.
///
/// A snippet is plain text plus highlight spans; markup is only ever added by the
/// renderers in [`crate::render`], after the text has been escaped.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::terms::SearchTerms;

/// Character budget for an answer snippet window, separators included.
pub const MAX_SNIPPET_LENGTH: usize = 150;

/// Half-open byte range `[start, end)` of highlighted text within a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    /// Sorted, non-overlapping, non-adjacent spans into `text`.
    pub highlights: Vec<HighlightSpan>,
    /// Text precedes the snippet in the source field.
    pub leading_ellipsis: bool,
    /// Text follows the snippet in the source field.
    pub trailing_ellipsis: bool,
}

impl Snippet {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split the text into consecutive `(segment, highlighted)` pieces.
    pub fn segments(&self) -> Vec<(&str, bool)> {
        let mut segments = Vec::with_capacity(self.highlights.len() * 2 + 1);
        let mut cursor = 0;
        for span in &self.highlights {
            if span.start > cursor {
                segments.push((&self.text[cursor..span.start], false));
            }
            segments.push((&self.text[span.start..span.end], true));
            cursor = span.end;
        }
        if cursor < self.text.len() {
            segments.push((&self.text[cursor..], false));
        }
        segments
    }

    /// The highlighted pieces of text, in order.
    pub fn highlighted(&self) -> impl Iterator<Item = &str> {
        self.highlights
            .iter()
            .map(|span| &self.text[span.start..span.end])
    }
}

/// Whole-text snippet with every occurrence of every term highlighted.
///
/// Overlapping occurrences are merged into a single span, so one stretch of
/// text is never highlighted twice. Occurrences that merely touch stay separate.
pub fn highlight_occurrences(text: &str, terms: &SearchTerms) -> Snippet {
    let mut highlights: Vec<HighlightSpan> = Vec::new();
    for (start, end) in terms.occurrences(text) {
        match highlights.last_mut() {
            Some(last) if start < last.end => last.end = last.end.max(end),
            _ => highlights.push(HighlightSpan { start, end }),
        }
    }

    Snippet {
        text: text.to_string(),
        highlights,
        leading_ellipsis: false,
        trailing_ellipsis: false,
    }
}

/// Best window of words around the matches in `text`.
///
/// Words are split on single spaces. Every start position is tried; a window grows
/// while its running length (word characters plus one separator each) is below
/// [`MAX_SNIPPET_LENGTH`]. The window holding the most matching words wins, the
/// earliest on ties. Matching words are highlighted whole. Returns an empty snippet
/// when no word matches.
pub fn context_snippet(text: &str, terms: &SearchTerms) -> Snippet {
    let words: Vec<&str> = text.split(' ').collect();
    let matching: Vec<bool> = words.iter().map(|word| terms.matches(word)).collect();

    if !matching.contains(&true) {
        return Snippet::default();
    }

    let mut best_start = 0;
    let mut best_count = 0;
    for start in 0..words.len() {
        let (_, count) = window(&words, &matching, start);
        if count > best_count {
            best_count = count;
            best_start = start;
        }
    }
    let (end, _) = window(&words, &matching, best_start);

    let mut snippet = Snippet {
        leading_ellipsis: best_start > 0,
        trailing_ellipsis: end < words.len(),
        ..Snippet::default()
    };
    for (index, word) in words.iter().enumerate().take(end).skip(best_start) {
        if index > best_start {
            snippet.text.push(' ');
        }
        let start = snippet.text.len();
        snippet.text.push_str(word);
        if matching[index] {
            snippet.highlights.push(HighlightSpan {
                start,
                end: snippet.text.len(),
            });
        }
    }
    snippet
}

/// Exclusive end index and matching-word count of the window starting at `start`.
fn window(words: &[&str], matching: &[bool], start: usize) -> (usize, usize) {
    let mut length = 0;
    let mut count = 0;
    let mut end = start;
    while end < words.len() && length < MAX_SNIPPET_LENGTH {
        length += words[end].chars().count() + 1;
        if matching[end] {
            count += 1;
        }
        end += 1;
    }
    (end, count)
}

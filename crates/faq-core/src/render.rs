use std::borrow::Cow;

use crate::snippet::Snippet;

pub const HIGHLIGHT_OPEN: &str = "<mark>";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";
pub const ELLIPSIS: &str = "...";

/// Escape the characters that carry meaning in HTML text and attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

impl Snippet {
    /// Render as HTML. Field text is escaped first, so `<mark>` is the only markup
    /// that can appear in the output.
    pub fn to_html(&self) -> String {
        self.render(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE, escape_html)
    }

    /// Render with caller-chosen highlight markers and no escaping, e.g. `**`/`**`.
    pub fn to_marked(&self, open: &str, close: &str) -> String {
        self.render(open, close, Cow::Borrowed)
    }

    /// Text with ellipsis markers but no highlighting.
    pub fn to_plain(&self) -> String {
        self.render("", "", Cow::Borrowed)
    }

    fn render<'s, F>(&'s self, open: &str, close: &str, escape: F) -> String
    where
        F: Fn(&'s str) -> Cow<'s, str>,
    {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::with_capacity(self.text.len() + self.highlights.len() * 16 + 8);
        if self.leading_ellipsis {
            out.push_str(ELLIPSIS);
            out.push(' ');
        }
        for (segment, highlighted) in self.segments() {
            if highlighted {
                out.push_str(open);
                out.push_str(&escape(segment));
                out.push_str(close);
            } else {
                out.push_str(&escape(segment));
            }
        }
        if self.trailing_ellipsis {
            out.push(' ');
            out.push_str(ELLIPSIS);
        }
        out
    }
}

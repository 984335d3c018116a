use serde::{Deserialize, Serialize};

/// A run of text carrying uniform inline formatting.
///
/// Spans produced for one block never overlap; concatenating their `text`
/// reproduces the block's plain-text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    /// Inline math; `text` holds the expression.
    pub equation: bool,
    pub color: Option<String>,
    pub link: Option<String>,
}

impl RichTextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Same formatting, different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// True when both spans carry identical formatting (text ignored).
    pub fn same_style(&self, other: &RichTextSpan) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.strikethrough == other.strikethrough
            && self.underline == other.underline
            && self.code == other.code
            && self.equation == other.equation
            && self.color == other.color
            && self.link == other.link
    }

    pub fn is_plain(&self) -> bool {
        self.same_style(&RichTextSpan::default())
    }

    /// Length as counted by the destination: Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Concatenates span texts.
pub fn plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_text_keeps_style() {
        let span = RichTextSpan {
            text: "a".into(),
            bold: true,
            link: Some("https://example.com".into()),
            ..RichTextSpan::default()
        };
        let other = span.with_text("b");
        assert!(span.same_style(&other));
        assert_eq!(other.text, "b");
    }

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(RichTextSpan::plain("héllo").char_len(), 5);
    }

    #[test]
    fn plain_text_concatenates() {
        let spans = vec![RichTextSpan::plain("a"), RichTextSpan::plain("b")];
        assert_eq!(plain_text(&spans), "ab");
    }
}

use std::sync::OnceLock;

use regex::Regex;

use super::types::{ContentClassification, ContentKind, Metadata, SourceHint};

const BASE_CONFIDENCE: f64 = 0.55;
const PER_TAG: f64 = 0.05;
const MAX_COUNTED_TAGS: usize = 6;
const DOCUMENT_CONFIDENCE: f64 = 0.95;
const HINT_BONUS: f64 = 0.1;
const HINT_CAP: f64 = 0.99;

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)</?(html|head|body|div|span|p|a|ul|ol|li|table|thead|tbody|tr|td|th|h[1-6]|br|hr|img|strong|em|b|i|u|s|del|code|pre|blockquote|section|article|aside|header|footer|nav|main|meta|link|script|style|figure|figcaption)(\s[^<>]*)?/?>",
        )
        .expect("Invalid HTML tag regex")
    })
}

/// Markup made of known HTML tags. The HTML source hint raises confidence
/// but never makes tagless text HTML.
pub fn detect(text: &str, hint: SourceHint) -> Option<ContentClassification> {
    let head = text.chars().take(64).collect::<String>().to_ascii_lowercase();
    let document = head.starts_with("<!doctype html") || head.starts_with("<html");

    let tags = tag_regex()
        .find_iter(text)
        .take(MAX_COUNTED_TAGS + 1)
        .count();
    if tags == 0 && !document {
        return None;
    }

    let mut confidence = if document {
        DOCUMENT_CONFIDENCE
    } else {
        BASE_CONFIDENCE + PER_TAG * tags.min(MAX_COUNTED_TAGS) as f64
    };
    if hint == SourceHint::Html {
        confidence = (confidence + HINT_BONUS).min(HINT_CAP);
    }
    let metadata = Metadata {
        signals: Some(tags),
        ..Metadata::default()
    };
    Some(ContentClassification::new(ContentKind::Html, confidence).with_metadata(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_and_documents() {
        let c = detect("<p>Hello <b>world</b></p>", SourceHint::PlainText).unwrap();
        assert!(c.confidence > 0.5);
        assert_eq!(c.metadata.signals, Some(4));
        let doc = detect("<!DOCTYPE html><html><body></body></html>", SourceHint::PlainText).unwrap();
        assert_eq!(doc.confidence, DOCUMENT_CONFIDENCE);
    }

    #[test]
    fn html_hint_biases_upward_with_cap() {
        let plain = detect("<p>x</p>", SourceHint::PlainText).unwrap().confidence;
        let hinted = detect("<p>x</p>", SourceHint::Html).unwrap().confidence;
        assert!((hinted - plain - HINT_BONUS).abs() < 1e-9);
        let doc = detect("<!doctype html>", SourceHint::Html).unwrap();
        assert_eq!(doc.confidence, HINT_CAP);
    }

    #[test]
    fn hint_alone_is_not_enough() {
        assert!(detect("just words", SourceHint::Html).is_none());
        assert!(detect("a < b > c", SourceHint::PlainText).is_none());
    }
}

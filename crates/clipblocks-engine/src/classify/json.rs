use serde::de::IgnoredAny;

use super::types::{ContentClassification, ContentKind, Metadata};

pub const OBJECT_CONFIDENCE: f64 = 0.95;
pub const ARRAY_CONFIDENCE: f64 = 0.9;

/// A complete JSON object or array. Near-misses such as unquoted keys or
/// trailing commas fail the strict parse and fall through.
pub fn detect(text: &str) -> Option<ContentClassification> {
    let confidence = match (text.as_bytes().first(), text.as_bytes().last()) {
        (Some(b'{'), Some(b'}')) => OBJECT_CONFIDENCE,
        (Some(b'['), Some(b']')) => ARRAY_CONFIDENCE,
        _ => return None,
    };
    serde_json::from_str::<IgnoredAny>(text).ok()?;
    let metadata = Metadata {
        language: Some("json".to_string()),
        ..Metadata::default()
    };
    Some(ContentClassification::new(ContentKind::Json, confidence).with_metadata(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_and_array() {
        assert_eq!(
            detect(r#"{"function":"test","code":true,"array":[1,2,3]}"#).map(|c| c.confidence),
            Some(OBJECT_CONFIDENCE)
        );
        assert_eq!(detect("[1, 2, 3]").map(|c| c.confidence), Some(ARRAY_CONFIDENCE));
    }

    #[test]
    fn near_misses_fall_through() {
        assert!(detect("{key: 'value'}").is_none());
        assert!(detect(r#"{"a": 1,}"#).is_none());
        assert!(detect("[x]").is_none());
        assert!(detect("42").is_none());
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let deep = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
        assert!(detect(&deep).is_none());
    }
}

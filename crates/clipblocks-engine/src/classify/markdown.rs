use std::sync::OnceLock;

use regex::RegexSet;

use super::{
    MAX_SCAN_LINES,
    types::{ContentClassification, ContentKind, Metadata},
};

const BASE_CONFIDENCE: f64 = 0.45;
const PER_SIGNAL: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.9;

/// One pattern per markdown construct; each counts once however often it occurs.
fn signals() -> &'static RegexSet {
    static SIGNALS: OnceLock<RegexSet> = OnceLock::new();
    SIGNALS.get_or_init(|| {
        RegexSet::new([
            r"^#{1,6}\s+\S",
            r"^\s*[-*+]\s+\S",
            r"^\s*\d+[.)]\s+\S",
            r"^\s*[-*+]\s+\[[ xX]\]\s",
            r"^\s*>",
            r"^\s*(```|~~~)",
            r"\[[^\]]+\]\([^)\s]+\)",
            r"!\[[^\]]*\]\([^)\s]+\)",
            r"\*\*[^*\s][^*]*\*\*|__[^_\s][^_]*__",
            r"(^|\s)\*[^*\s][^*]*\*($|[\s.,;:!?])",
            r"`[^`]+`",
            r"~~[^~]+~~",
            r"^\s*\|.*\|\s*$",
            r"^\s*([-*_]\s*){3,}$",
        ])
        .expect("Invalid markdown signal regex")
    })
}

pub fn detect(text: &str) -> Option<ContentClassification> {
    let patterns = signals();
    let mut seen = vec![false; patterns.len()];
    for line in text.lines().take(MAX_SCAN_LINES) {
        for i in patterns.matches(line).iter() {
            seen[i] = true;
        }
    }
    let found = seen.iter().filter(|s| **s).count();
    if found == 0 {
        return None;
    }
    let confidence = (BASE_CONFIDENCE + PER_SIGNAL * found as f64).min(MAX_CONFIDENCE);
    let metadata = Metadata {
        signals: Some(found),
        ..Metadata::default()
    };
    Some(ContentClassification::new(ContentKind::Markdown, confidence).with_metadata(metadata))
}

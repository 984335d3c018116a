use std::sync::OnceLock;

use regex::{Regex, RegexSet};

use super::{
    MAX_SCAN_LINES,
    language,
    types::{ContentClassification, ContentKind, Metadata},
};

const BASE_CONFIDENCE: f64 = 0.7;
const MAX_CONFIDENCE: f64 = 0.95;
/// Below this share of structural lines the text reads as prose.
const MIN_STRUCTURAL_RATIO: f64 = 0.25;

/// Line shapes prose almost never has: declarations, imports, control
/// flow with brackets, comments, queries.
fn strong_lines() -> &'static RegexSet {
    static STRONG: OnceLock<RegexSet> = OnceLock::new();
    STRONG.get_or_init(|| {
        RegexSet::new([
            r"^\s*(async\s+)?(def|fn|func|function)\s+\w+\s*[(<]",
            r"^\s*(export\s+)?(pub\s+)?(class|struct|enum|interface|trait|impl)\s+\w+",
            r"^\s*(const|let|var)\s+(mut\s+)?\w+\s*[:=]",
            r"^\s*import\s+[\w.{*]+(\s+from\s+|\s+as\s+|\s*;|\s*$)",
            r"^\s*from\s+[\w.]+\s+import\s+",
            r"^\s*use\s+[\w:]+(::[\w{}*, ]+)?;",
            r"^\s*#include\s*[<\x22]",
            r"^\s*package\s+[\w.]+;?\s*$",
            r"^\s*(public|private|protected)\s+[\w<>\[\], ]+[({;=]",
            r"^\s*(if|while|for|switch)\s*\(.*\)\s*\{?\s*$",
            r"^\s*(if|elif|while|for)\s.*:\s*$",
            r"^\s*(return|break|continue)\b.*;\s*$",
            r"^\s*(//|/\*|\*/|#!)",
            r"^\s*(SELECT|INSERT INTO|UPDATE|DELETE FROM|CREATE TABLE|ALTER TABLE)\b",
            r"^\s*\$ \w+",
            r"\)\s*=>",
        ])
        .expect("Invalid code signal regex")
    })
}

/// Punctuation at a line edge. Prose ends lines with `;` too, so these only
/// count once a bracketed block shows up.
fn weak_lines() -> &'static RegexSet {
    static WEAK: OnceLock<RegexSet> = OnceLock::new();
    WEAK.get_or_init(|| {
        RegexSet::new([r";\s*$", r"\{\s*$", r"^\s*[})\]];?\s*$", r"\}\s*$"])
            .expect("Invalid code signal regex")
    })
}

const OPENS_BLOCK: usize = 1;
const CLOSES_BLOCK: usize = 2;

/// Headings, list items and quotes: text written as markup, not code.
fn markup_block() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        Regex::new(r"^\s*(#{1,6}\s|[-*+]\s|\d{1,9}[.)]\s|>)").expect("Invalid markup block regex")
    })
}

#[derive(Default)]
struct Signals {
    lines: usize,
    strong: usize,
    weak: usize,
    opens: bool,
    closes: bool,
}

impl Signals {
    fn structural(&self) -> usize {
        self.strong + self.weak
    }

    /// One declaration is enough; edge punctuation alone needs a block
    /// opened and closed across at least two lines.
    fn is_code(&self) -> bool {
        self.strong > 0 || (self.weak >= 2 && self.opens && self.closes)
    }
}

/// Source code in any common language.
///
/// Markdown documents that merely contain fenced code are left to the
/// markdown detector.
pub fn detect(text: &str) -> Option<ContentClassification> {
    let mut signals = Signals::default();
    for line in text.lines().take(MAX_SCAN_LINES) {
        let t = line.trim_start();
        if t.is_empty() {
            continue;
        }
        if t.starts_with("```") || t.starts_with("~~~") {
            return None;
        }
        signals.lines += 1;
        if markup_block().is_match(line) {
            continue;
        }
        if strong_lines().is_match(line) {
            signals.strong += 1;
            continue;
        }
        let weak = weak_lines().matches(line);
        if weak.matched_any() {
            signals.weak += 1;
            signals.opens |= weak.matched(OPENS_BLOCK);
            signals.closes |= weak.matched(CLOSES_BLOCK);
        }
    }
    if !signals.is_code() {
        return None;
    }
    let ratio = signals.structural() as f64 / signals.lines as f64;
    if ratio < MIN_STRUCTURAL_RATIO {
        return None;
    }

    let sample = bounded_prefix(text);
    let metadata = Metadata {
        language: language::detect(sample).map(str::to_string),
        ..Metadata::default()
    };
    let confidence = (BASE_CONFIDENCE + 0.25 * ratio).min(MAX_CONFIDENCE);
    Some(ContentClassification::new(ContentKind::Code, confidence).with_metadata(metadata))
}

/// The first `MAX_SCAN_LINES` lines of `text`.
fn bounded_prefix(text: &str) -> &str {
    match text.match_indices('\n').nth(MAX_SCAN_LINES - 1) {
        Some((at, _)) => &text[..at],
        None => text,
    }
}

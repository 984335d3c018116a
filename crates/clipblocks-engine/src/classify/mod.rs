//! # Content Classification
//!
//! Guesses what kind of content a blob of captured text is. Detectors run
//! in a fixed priority order and the **first** one whose confidence
//! reaches the threshold wins; there is no best-of-all comparison.
//!
//! Priority: URL > LaTeX > JSON > Code > Table > HTML > Markdown > Text.
//!
//! Every detector is a bounded scan or a finite-automaton regex, so
//! classification stays linear in the input length. Text with confidence
//! 1.0 is returned whenever nothing else matches, including for empty,
//! whitespace-only or binary-looking input.

mod code;
mod html;
mod json;
pub mod language;
mod latex;
mod markdown;
mod table;
mod types;
pub mod url;

pub use latex::unwrap_math;
pub use types::{
    ClassifierOptions, ContentClassification, ContentKind, EnabledDetectors, Metadata, SourceHint,
    UrlTarget,
};

use crate::error::OptionsError;

/// Line-ratio heuristics look at no more than this many lines.
pub const MAX_SCAN_LINES: usize = 500;

/// Characters sampled when checking for binary input.
const BINARY_SAMPLE: usize = 4096;
/// Share of control characters above which input is treated as binary.
const BINARY_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detector {
    Url,
    Latex,
    Json,
    Code,
    Table,
    Html,
    Markdown,
}

const PRIORITY: [Detector; 7] = [
    Detector::Url,
    Detector::Latex,
    Detector::Json,
    Detector::Code,
    Detector::Table,
    Detector::Html,
    Detector::Markdown,
];

/// A validated classifier configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    options: ClassifierOptions,
}

impl Classifier {
    pub fn new(options: ClassifierOptions) -> Result<Self, OptionsError> {
        let threshold = options.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(OptionsError::ConfidenceThreshold(threshold));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    pub fn classify(&self, text: &str) -> ContentClassification {
        let trimmed = text.trim();
        if trimmed.is_empty() || looks_binary(trimmed) {
            return ContentClassification::text();
        }

        for detector in PRIORITY {
            if !self.enabled(detector) {
                continue;
            }
            let Some(found) = self.run(detector, trimmed) else {
                continue;
            };
            if found.confidence >= self.options.confidence_threshold {
                log::debug!(
                    "classified {} bytes as {} ({:.2})",
                    text.len(),
                    found.kind.name(),
                    found.confidence
                );
                return found;
            }
            log::trace!(
                "{:?} detector below threshold ({:.2})",
                detector,
                found.confidence
            );
        }
        log::debug!("classified {} bytes as text", text.len());
        ContentClassification::text()
    }

    fn enabled(&self, detector: Detector) -> bool {
        let d = &self.options.detectors;
        match detector {
            Detector::Url => d.url,
            Detector::Latex => d.latex,
            Detector::Json => d.json,
            Detector::Code => d.code,
            Detector::Table => d.table,
            Detector::Html => d.html,
            Detector::Markdown => d.markdown,
        }
    }

    fn run(&self, detector: Detector, text: &str) -> Option<ContentClassification> {
        match detector {
            Detector::Url => url::detect(text),
            Detector::Latex => latex::detect(text),
            Detector::Json => json::detect(text),
            Detector::Code => code::detect(text),
            Detector::Table => table::detect(text),
            Detector::Html => html::detect(text, self.options.source_hint),
            Detector::Markdown => markdown::detect(text),
        }
    }
}

/// Classifies with default options.
pub fn classify(text: &str) -> ContentClassification {
    Classifier::default().classify(text)
}

/// Too many control characters in the leading sample.
fn looks_binary(text: &str) -> bool {
    let mut sampled = 0usize;
    let mut control = 0usize;
    for c in text.chars().take(BINARY_SAMPLE) {
        sampled += 1;
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
            control += 1;
        }
    }
    sampled > 0 && control as f64 / sampled as f64 > BINARY_RATIO
}

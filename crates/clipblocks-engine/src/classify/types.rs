use serde::{Deserialize, Serialize};

use crate::ast::TableFormat;

/// The detected kind of a blob of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Url,
    Code,
    Json,
    Latex,
    Html,
    Table(TableFormat),
    Markdown,
    Text,
}

impl ContentKind {
    pub fn name(self) -> &'static str {
        match self {
            ContentKind::Url => "url",
            ContentKind::Code => "code",
            ContentKind::Json => "json",
            ContentKind::Latex => "latex",
            ContentKind::Html => "html",
            ContentKind::Table(TableFormat::Csv) => "csv",
            ContentKind::Table(TableFormat::Tsv) => "tsv",
            ContentKind::Table(TableFormat::Markdown) => "markdown_table",
            ContentKind::Markdown => "markdown",
            ContentKind::Text => "text",
        }
    }
}

/// What a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlTarget {
    Image,
    Video,
    Audio,
    File,
    Page,
}

/// Detector-specific facts; only the fields a detector knows are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<UrlTarget>,
    /// LaTeX: display (block) math rather than inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    /// Number of markup signals found (markdown, html).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentClassification {
    pub kind: ContentKind,
    pub confidence: f64,
    pub metadata: Metadata,
}

impl ContentClassification {
    pub fn new(kind: ContentKind, confidence: f64) -> Self {
        Self {
            kind,
            confidence,
            metadata: Metadata::default(),
        }
    }

    /// The universal fallback.
    pub fn text() -> Self {
        Self::new(ContentKind::Text, 1.0)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Where the host captured the text from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceHint {
    #[default]
    PlainText,
    /// An HTML clipboard flavor; biases the HTML detector upward.
    Html,
    File,
}

/// Per-kind detector switches. Text cannot be disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledDetectors {
    pub url: bool,
    pub latex: bool,
    pub json: bool,
    pub code: bool,
    pub table: bool,
    pub html: bool,
    pub markdown: bool,
}

impl Default for EnabledDetectors {
    fn default() -> Self {
        Self {
            url: true,
            latex: true,
            json: true,
            code: true,
            table: true,
            html: true,
            markdown: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Minimum confidence for a detector's answer to be accepted.
    pub confidence_threshold: f64,
    pub source_hint: SourceHint,
    pub detectors: EnabledDetectors,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            source_hint: SourceHint::PlainText,
            detectors: EnabledDetectors::default(),
        }
    }
}

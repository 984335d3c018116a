use std::ops::Range;

use crate::ast::{ListType, TableFormat};

/// Where a callout token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutSource {
    /// `> [!type] title`
    Markup,
    /// `<aside>…</aside>`
    Html,
}

/// One token per block construct, with the construct's local facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Source level 1..=6; clamping happens in the parser.
    Heading { level: u8 },
    ListItem {
        list_type: ListType,
        checked: Option<bool>,
        number: Option<u32>,
    },
    /// A whole fenced block. `closed` is false when input ended first.
    CodeBlock {
        language: Option<String>,
        closed: bool,
    },
    TableRow {
        format: TableFormat,
        cells: Vec<String>,
        separator: bool,
    },
    Quote { depth: u8 },
    Callout {
        callout_type: String,
        source: CalloutSource,
        icon: Option<String>,
    },
    Equation { display: bool },
    Divider,
    Toggle,
    Image { alt: String, url: String },
    LinkLine { title: Option<String>, url: String },
    Paragraph,
    Blank,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Heading { .. } => "heading",
            TokenKind::ListItem { .. } => "list_item",
            TokenKind::CodeBlock { .. } => "code_block",
            TokenKind::TableRow { .. } => "table_row",
            TokenKind::Quote { .. } => "quote",
            TokenKind::Callout { .. } => "callout",
            TokenKind::Equation { .. } => "equation",
            TokenKind::Divider => "divider",
            TokenKind::Toggle => "toggle",
            TokenKind::Image { .. } => "image",
            TokenKind::LinkLine { .. } => "link_line",
            TokenKind::Paragraph => "paragraph",
            TokenKind::Blank => "blank",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source lines exactly as written, joined with `\n`.
    pub raw: String,
    /// Construct text with markers, prefixes and indentation removed.
    pub content: String,
    /// Leading whitespace of the first line in columns (tab = 4).
    pub indent: usize,
    /// Zero-based source lines covered, end exclusive.
    pub lines: Range<usize>,
}

impl Token {
    pub fn is_blank(&self) -> bool {
        self.kind == TokenKind::Blank
    }

    /// Dequoted depth for quote lines, 0 otherwise.
    pub fn quote_depth(&self) -> u8 {
        match self.kind {
            TokenKind::Quote { depth } => depth,
            _ => 0,
        }
    }
}

use std::ops::Range;

use serde::Serialize;

use crate::parsing::inline::RichTextSpan;

/// Destination block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    Callout,
    Code,
    Equation,
    Divider,
    Image,
    Video,
    Audio,
    File,
    Bookmark,
    Table,
    TableRow,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading_1",
            BlockType::Heading2 => "heading_2",
            BlockType::Heading3 => "heading_3",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::ToDo => "to_do",
            BlockType::Toggle => "toggle",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Code => "code",
            BlockType::Equation => "equation",
            BlockType::Divider => "divider",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Audio => "audio",
            BlockType::File => "file",
            BlockType::Bookmark => "bookmark",
            BlockType::Table => "table",
            BlockType::TableRow => "table_row",
        }
    }

    pub fn heading(level: u8) -> Self {
        match level {
            1 => BlockType::Heading1,
            2 => BlockType::Heading2,
            _ => BlockType::Heading3,
        }
    }

    /// Types whose text lives in `rich_text`.
    pub fn is_text_bearing(self) -> bool {
        matches!(
            self,
            BlockType::Paragraph
                | BlockType::Heading1
                | BlockType::Heading2
                | BlockType::Heading3
                | BlockType::BulletedListItem
                | BlockType::NumberedListItem
                | BlockType::ToDo
                | BlockType::Toggle
                | BlockType::Quote
                | BlockType::Callout
                | BlockType::Code
        )
    }
}

/// Type-specific block data beyond `rich_text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Payload {
    None,
    Heading { is_toggleable: bool },
    ToDo { checked: bool },
    Callout { icon: String, color: String },
    Code { language: String },
    Equation { expression: String },
    Media { url: String, caption: Vec<RichTextSpan> },
    Bookmark { url: String, caption: Vec<RichTextSpan> },
    Table { width: usize, has_column_header: bool },
    TableRow { cells: Vec<Vec<RichTextSpan>> },
}

/// One block in the destination representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub payload: Payload,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rich_text: Vec<RichTextSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FormattedBlock>,
}

impl FormattedBlock {
    pub fn new(block_type: BlockType, payload: Payload) -> Self {
        Self {
            block_type,
            payload,
            rich_text: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, rich_text: Vec<RichTextSpan>) -> Self {
        self.rich_text = rich_text;
        self
    }

    /// This block plus all descendants.
    pub fn flattened_count(&self) -> usize {
        1 + self.children.iter().map(Self::flattened_count).sum::<usize>()
    }

    /// Every span carried by the block: text, captions and table cells.
    pub fn spans(&self) -> impl Iterator<Item = &RichTextSpan> {
        let extra: Box<dyn Iterator<Item = &RichTextSpan>> = match &self.payload {
            Payload::Media { caption, .. } | Payload::Bookmark { caption, .. } => {
                Box::new(caption.iter())
            }
            Payload::TableRow { cells } => Box::new(cells.iter().flatten()),
            _ => Box::new(std::iter::empty()),
        };
        self.rich_text.iter().chain(extra)
    }

    pub(crate) fn spans_mut(&mut self) -> Vec<&mut Vec<RichTextSpan>> {
        let mut lists = vec![&mut self.rich_text];
        match &mut self.payload {
            Payload::Media { caption, .. } | Payload::Bookmark { caption, .. } => lists.push(caption),
            Payload::TableRow { cells } => lists.extend(cells.iter_mut()),
            _ => {}
        }
        lists
    }
}

/// The limit a block breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "limit")]
pub enum Limit {
    RichTextLength { actual: usize, max: usize },
    BlockCount { actual: usize, max: usize },
    NestingDepth { actual: usize, max: usize },
    EquationLength { actual: usize, max: usize },
    TableWidth { actual: usize, expected: usize },
    EmptyBlock,
}

/// What the formatter does, or would do, about a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Remediation {
    /// Content divided into consecutive spans, blocks or chunks.
    Split,
    /// Descendants lifted to siblings at the deepest allowed level.
    Flatten,
    /// Short table rows padded with empty cells.
    Pad,
    DropIfEmpty,
    /// Cannot be fixed without losing content; the caller decides.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Child indexes from the top-level list down to the offending block;
    /// empty for whole-set violations.
    pub path: Vec<usize>,
    pub block_type: Option<BlockType>,
    pub limit: Limit,
    pub remediation: Remediation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub blocks: Vec<FormattedBlock>,
    pub violations: Vec<Violation>,
}

/// Formatter output: blocks, request chunks and what was changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedDocument {
    pub blocks: Vec<FormattedBlock>,
    /// Top-level index ranges, one per write request.
    pub chunks: Vec<Range<usize>>,
    pub remediations: Vec<Violation>,
}

impl FormattedDocument {
    pub fn chunk(&self, i: usize) -> Option<&[FormattedBlock]> {
        self.chunks.get(i).map(|r| &self.blocks[r.clone()])
    }

    pub fn chunk_slices(&self) -> impl Iterator<Item = &[FormattedBlock]> {
        self.chunks.iter().map(|r| &self.blocks[r.clone()])
    }

    pub fn total_blocks(&self) -> usize {
        self.blocks.iter().map(FormattedBlock::flattened_count).sum()
    }
}

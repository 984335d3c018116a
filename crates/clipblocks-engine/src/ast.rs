//! # Abstract Syntax Tree
//!
//! The intermediate tree shared by the pretty printer and the block
//! formatter. Node kinds form a closed enum; each variant carries exactly
//! the metadata its type needs, so there is no untyped metadata map.
//!
//! ## Invariants
//!
//! - Only structurally recursive kinds (`ListItem`, `Toggle`) own children.
//! - When `formatting` is present, concatenating its span texts yields
//!   `content` exactly.

use serde::{Deserialize, Serialize};

use crate::parsing::inline::RichTextSpan;

/// Source delimiter of a table, shared by the classifier and the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// Pipe table with a `---` separator row.
    Markdown,
    /// Comma separated values.
    Csv,
    /// Tab separated values.
    Tsv,
}

impl TableFormat {
    pub fn delimiter(self) -> char {
        match self {
            TableFormat::Markdown => '|',
            TableFormat::Csv => ',',
            TableFormat::Tsv => '\t',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bulleted,
    Numbered,
    Todo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemMeta {
    pub list_type: ListType,
    /// Only meaningful for `Todo` items.
    pub checked: Option<bool>,
    /// Rendered as a collapsible item with its children folded inside.
    pub is_toggleable: bool,
    /// Ordinal written in the source for numbered items.
    pub number: Option<u32>,
}

impl ListItemMeta {
    pub fn bulleted() -> Self {
        Self {
            list_type: ListType::Bulleted,
            checked: None,
            is_toggleable: false,
            number: None,
        }
    }

    pub fn numbered(number: u32) -> Self {
        Self {
            list_type: ListType::Numbered,
            checked: None,
            is_toggleable: false,
            number: Some(number),
        }
    }

    pub fn todo(checked: bool) -> Self {
        Self {
            list_type: ListType::Todo,
            checked: Some(checked),
            is_toggleable: false,
            number: None,
        }
    }
}

/// Table contents, normalized so every row has `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    pub table_type: TableFormat,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableMeta {
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutMeta {
    /// Lowercased admonition type, e.g. `warning`.
    pub callout_type: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMeta {
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
}

/// The closed set of node kinds with their type-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Paragraph,
    /// Level is always within `1..=3`.
    Heading { level: u8 },
    ListItem(ListItemMeta),
    Code {
        language: Option<String>,
        is_block: bool,
    },
    Table(TableMeta),
    Callout(CalloutMeta),
    Quote,
    /// A collapsible section; `heading_level` is set for folded headings.
    Toggle { heading_level: Option<u8> },
    Divider,
    Media(MediaMeta),
    Equation { is_block: bool },
    Bookmark { url: String, title: Option<String> },
}

impl NodeKind {
    /// Stable snake_case name of the node type.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading { level: 1 } => "heading_1",
            NodeKind::Heading { level: 2 } => "heading_2",
            NodeKind::Heading { .. } => "heading_3",
            NodeKind::ListItem(_) => "list_item",
            NodeKind::Code { .. } => "code",
            NodeKind::Table(_) => "table",
            NodeKind::Callout(_) => "callout",
            NodeKind::Quote => "quote",
            NodeKind::Toggle { .. } => "toggle",
            NodeKind::Divider => "divider",
            NodeKind::Media(m) => match m.kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
                MediaKind::Audio => "audio",
                MediaKind::File => "file",
            },
            NodeKind::Equation { .. } => "equation",
            NodeKind::Bookmark { .. } => "bookmark",
        }
    }

    /// Kinds allowed to own child nodes.
    pub fn is_recursive(&self) -> bool {
        matches!(self, NodeKind::ListItem(_) | NodeKind::Toggle { .. })
    }

    /// Kinds whose `content` is inline markup and receives rich-text formatting.
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::ListItem(_)
                | NodeKind::Callout(_)
                | NodeKind::Quote
                | NodeKind::Toggle { .. }
        )
    }
}

/// A node of the intermediate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub kind: NodeKind,
    /// Plain-text content with inline markers stripped when `formatting` is set.
    pub content: String,
    pub formatting: Option<Vec<RichTextSpan>>,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(kind: NodeKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            formatting: None,
            children: Vec::new(),
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Paragraph, content)
    }

    pub fn heading(level: u8, content: impl Into<String>) -> Self {
        Self::new(
            NodeKind::Heading {
                level: level.clamp(1, 3),
            },
            content,
        )
    }

    pub fn divider() -> Self {
        Self::new(NodeKind::Divider, "")
    }

    /// Attaches children. Leaf kinds must not receive any.
    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        debug_assert!(
            self.kind.is_recursive() || children.is_empty(),
            "{} nodes cannot own children",
            self.kind.type_name()
        );
        self.children = children;
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Text as spans, falling back to a single plain span over `content`.
    pub fn spans(&self) -> Vec<RichTextSpan> {
        match &self.formatting {
            Some(spans) => spans.clone(),
            None if self.content.is_empty() => Vec::new(),
            None => vec![RichTextSpan::plain(self.content.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_is_clamped_to_three() {
        assert_eq!(AstNode::heading(5, "Deep").type_name(), "heading_3");
        assert_eq!(AstNode::heading(0, "Top").type_name(), "heading_1");
    }

    #[test]
    fn only_lists_and_toggles_are_recursive() {
        assert!(NodeKind::ListItem(ListItemMeta::bulleted()).is_recursive());
        assert!(NodeKind::Toggle { heading_level: None }.is_recursive());
        assert!(!NodeKind::Quote.is_recursive());
        assert!(!NodeKind::Paragraph.is_recursive());
    }

    #[test]
    fn media_type_names_follow_kind() {
        let node = AstNode::new(
            NodeKind::Media(MediaMeta {
                kind: MediaKind::Video,
                url: "https://example.com/a.mp4".into(),
                caption: None,
            }),
            "",
        );
        assert_eq!(node.type_name(), "video");
    }

    #[test]
    fn spans_fall_back_to_plain_content() {
        let node = AstNode::paragraph("hello");
        let spans = node.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "hello");
        assert!(AstNode::divider().spans().is_empty());
    }
}

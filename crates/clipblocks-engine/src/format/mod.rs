//! # Block Formatter
//!
//! Turns [`AstNode`]s into destination [`FormattedBlock`]s and brings them
//! within [`DestinationLimits`]: empty blocks dropped, whitespace
//! collapsed, long spans split, deep nesting flattened, and the result
//! packed into request-sized chunks. Content is never truncated.
//!
//! [`validate`] is the read-only counterpart; it reports what is still
//! out of bounds.

mod limits;
mod types;
mod validate;

pub use limits::{DestinationLimits, MAX_NESTING_LIMIT};
pub use types::{
    BlockType, FormattedBlock, FormattedDocument, Limit, Payload, Remediation, ValidationResult,
    Violation,
};
pub use validate::validate;

use serde::{Deserialize, Serialize};

use crate::{
    ast::{AstNode, ListType, MediaKind, NodeKind, TableFormat, TableMeta},
    error::OptionsError,
    parsing::inline::{RichTextSpan, from_markup},
};

/// Code language used when a block has none.
pub const PLAIN_TEXT_LANGUAGE: &str = "plain text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub remove_empty_blocks: bool,
    pub normalize_whitespace: bool,
    pub enforce_block_limits: bool,
    /// Emit one quote block per source line.
    pub split_multiline_quotes: bool,
    pub limits: DestinationLimits,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            remove_empty_blocks: true,
            normalize_whitespace: true,
            enforce_block_limits: true,
            split_multiline_quotes: false,
            limits: DestinationLimits::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Result<Self, OptionsError> {
        options.limits.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn format(&self, nodes: &[AstNode]) -> FormattedDocument {
        let opts = &self.options;
        let bounds = &opts.limits;
        let mut remediations = Vec::new();

        let mut blocks: Vec<FormattedBlock> = nodes.iter().map(to_block).collect();

        if opts.split_multiline_quotes {
            blocks = split_quotes(blocks);
        }
        if opts.normalize_whitespace {
            for_each_block(&mut blocks, &mut normalize_block);
        }
        if opts.remove_empty_blocks {
            blocks = drop_empty(blocks, &mut Vec::new(), &mut remediations);
        }
        if opts.enforce_block_limits {
            let mut path = Vec::new();
            split_spans(&mut blocks, bounds.max_rich_text_length, &mut path, &mut remediations);
            blocks = limits::flatten_depth(blocks, bounds.max_nesting_depth, &mut remediations);
            pad_rows(&mut blocks, &mut path, &mut remediations);
            blocks = limits::split_large_blocks(blocks, bounds.max_blocks_per_request, &mut remediations);
            blocks = limits::split_large_tables(blocks, bounds.max_blocks_per_request, &mut remediations);
            report_unfixable(&blocks, bounds, &mut remediations);
        }

        let chunks = if opts.enforce_block_limits {
            limits::chunk_ranges(&blocks, bounds.max_blocks_per_request)
        } else if blocks.is_empty() {
            Vec::new()
        } else {
            vec![0..blocks.len()]
        };

        let doc = FormattedDocument {
            blocks,
            chunks,
            remediations,
        };
        log::debug!(
            "formatted {} blocks into {} chunks with {} remediations",
            doc.total_blocks(),
            doc.chunks.len(),
            doc.remediations.len()
        );
        doc
    }
}

/// Formats with the given options.
pub fn format(nodes: &[AstNode], options: &FormatOptions) -> Result<FormattedDocument, OptionsError> {
    Ok(Formatter::new(*options)?.format(nodes))
}

fn to_block(node: &AstNode) -> FormattedBlock {
    let spans = node.spans();
    let children = || node.children.iter().map(to_block).collect::<Vec<_>>();
    let mut block = match &node.kind {
        NodeKind::Paragraph => FormattedBlock::new(BlockType::Paragraph, Payload::None).with_text(spans),
        NodeKind::Heading { level } => FormattedBlock::new(
            BlockType::heading(*level),
            Payload::Heading {
                is_toggleable: false,
            },
        )
        .with_text(spans),
        NodeKind::ListItem(meta) => {
            let (block_type, payload) = match (meta.is_toggleable, meta.list_type) {
                (true, _) => (BlockType::Toggle, Payload::None),
                (false, ListType::Bulleted) => (BlockType::BulletedListItem, Payload::None),
                (false, ListType::Numbered) => (BlockType::NumberedListItem, Payload::None),
                (false, ListType::Todo) => (
                    BlockType::ToDo,
                    Payload::ToDo {
                        checked: meta.checked.unwrap_or(false),
                    },
                ),
            };
            FormattedBlock::new(block_type, payload).with_text(spans)
        }
        NodeKind::Toggle {
            heading_level: Some(level),
        } => FormattedBlock::new(
            BlockType::heading(*level),
            Payload::Heading {
                is_toggleable: true,
            },
        )
        .with_text(spans),
        NodeKind::Toggle { heading_level: None } => {
            FormattedBlock::new(BlockType::Toggle, Payload::None).with_text(spans)
        }
        NodeKind::Quote => FormattedBlock::new(BlockType::Quote, Payload::None).with_text(spans),
        NodeKind::Callout(meta) => FormattedBlock::new(
            BlockType::Callout,
            Payload::Callout {
                icon: meta.icon.clone(),
                color: meta.color.clone(),
            },
        )
        .with_text(spans),
        NodeKind::Code {
            language,
            is_block: true,
        } => FormattedBlock::new(
            BlockType::Code,
            Payload::Code {
                language: language.clone().unwrap_or_else(|| PLAIN_TEXT_LANGUAGE.to_string()),
            },
        )
        .with_text(plain(&node.content)),
        NodeKind::Code { is_block: false, .. } => FormattedBlock::new(BlockType::Paragraph, Payload::None)
            .with_text(vec![RichTextSpan {
                code: true,
                ..RichTextSpan::plain(node.content.clone())
            }]),
        NodeKind::Equation { is_block: true } => FormattedBlock::new(
            BlockType::Equation,
            Payload::Equation {
                expression: node.content.clone(),
            },
        ),
        NodeKind::Equation { is_block: false } => FormattedBlock::new(BlockType::Paragraph, Payload::None)
            .with_text(vec![RichTextSpan {
                equation: true,
                ..RichTextSpan::plain(node.content.clone())
            }]),
        NodeKind::Divider => FormattedBlock::new(BlockType::Divider, Payload::None),
        NodeKind::Media(meta) => {
            let block_type = match meta.kind {
                MediaKind::Image => BlockType::Image,
                MediaKind::Video => BlockType::Video,
                MediaKind::Audio => BlockType::Audio,
                MediaKind::File => BlockType::File,
            };
            FormattedBlock::new(
                block_type,
                Payload::Media {
                    url: meta.url.clone(),
                    caption: meta.caption.as_deref().map(plain).unwrap_or_default(),
                },
            )
        }
        NodeKind::Bookmark { url, title } => FormattedBlock::new(
            BlockType::Bookmark,
            Payload::Bookmark {
                url: url.clone(),
                caption: title.as_deref().map(plain).unwrap_or_default(),
            },
        ),
        NodeKind::Table(meta) => return table_block(meta),
    };
    block.children = children();
    block
}

fn plain(text: &str) -> Vec<RichTextSpan> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![RichTextSpan::plain(text)]
    }
}

fn table_block(meta: &TableMeta) -> FormattedBlock {
    let cell = |text: &String| match meta.table_type {
        TableFormat::Markdown => from_markup(text),
        TableFormat::Csv | TableFormat::Tsv => plain(text),
    };
    let row = |cells: &Vec<String>| {
        FormattedBlock::new(
            BlockType::TableRow,
            Payload::TableRow {
                cells: cells.iter().map(cell).collect(),
            },
        )
    };
    let mut block = FormattedBlock::new(
        BlockType::Table,
        Payload::Table {
            width: meta.width(),
            has_column_header: !meta.headers.is_empty(),
        },
    );
    block.children = std::iter::once(&meta.headers)
        .filter(|h| !h.is_empty())
        .chain(&meta.rows)
        .map(row)
        .collect();
    block
}

fn for_each_block(blocks: &mut [FormattedBlock], f: &mut impl FnMut(&mut FormattedBlock)) {
    for block in blocks {
        f(block);
        for_each_block(&mut block.children, f);
    }
}

/// One quote block per line; children stay with the last line.
fn split_quotes(blocks: Vec<FormattedBlock>) -> Vec<FormattedBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in blocks {
        block.children = split_quotes(std::mem::take(&mut block.children));
        if block.block_type != BlockType::Quote || !block.rich_text.iter().any(|s| s.text.contains('\n')) {
            out.push(block);
            continue;
        }
        let children = std::mem::take(&mut block.children);
        let mut lines: Vec<Vec<RichTextSpan>> = vec![Vec::new()];
        for span in &block.rich_text {
            for (i, piece) in span.text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if !piece.is_empty()
                    && let Some(line) = lines.last_mut()
                {
                    line.push(span.with_text(piece));
                }
            }
        }
        let mut quotes: Vec<FormattedBlock> = lines
            .into_iter()
            .map(|line| FormattedBlock::new(BlockType::Quote, Payload::None).with_text(line))
            .collect();
        if let Some(last) = quotes.last_mut() {
            last.children = children;
        }
        out.extend(quotes);
    }
    out
}

fn normalize_block(block: &mut FormattedBlock) {
    if block.block_type == BlockType::Code {
        return;
    }
    for spans in block.spans_mut() {
        normalize_spans(spans);
    }
}

/// Collapses runs of spaces and tabs, trims the outer edges and drops
/// spans left empty. Code and equation spans are left alone.
fn normalize_spans(spans: &mut Vec<RichTextSpan>) {
    for span in spans.iter_mut() {
        if span.code || span.equation {
            continue;
        }
        let mut text = String::with_capacity(span.text.len());
        let mut in_run = false;
        for c in span.text.chars() {
            if c == ' ' || c == '\t' {
                if !in_run {
                    text.push(' ');
                }
                in_run = true;
            } else {
                text.push(c);
                in_run = false;
            }
        }
        span.text = text;
    }
    if let Some(first) = spans.first_mut()
        && !first.code
        && !first.equation
    {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = spans.last_mut()
        && !last.code
        && !last.equation
    {
        last.text = last.text.trim_end().to_string();
    }
    spans.retain(|s| !s.text.is_empty());
}

fn drop_empty(blocks: Vec<FormattedBlock>, path: &mut Vec<usize>, log: &mut Vec<Violation>) -> Vec<FormattedBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    for (i, mut block) in blocks.into_iter().enumerate() {
        path.push(i);
        if block.block_type != BlockType::Table {
            block.children = drop_empty(std::mem::take(&mut block.children), path, log);
        }
        if validate::is_empty(&block) {
            log.push(Violation {
                path: path.clone(),
                block_type: Some(block.block_type),
                limit: Limit::EmptyBlock,
                remediation: Remediation::DropIfEmpty,
            });
        } else {
            out.push(block);
        }
        path.pop();
    }
    out
}

fn split_spans(blocks: &mut [FormattedBlock], max: usize, path: &mut Vec<usize>, log: &mut Vec<Violation>) {
    for (i, block) in blocks.iter_mut().enumerate() {
        path.push(i);
        let longest = block.spans().map(RichTextSpan::char_len).max().unwrap_or_default();
        if longest > max {
            for spans in block.spans_mut() {
                limits::split_long_spans(spans, max);
            }
            log.push(Violation {
                path: path.clone(),
                block_type: Some(block.block_type),
                limit: Limit::RichTextLength { actual: longest, max },
                remediation: Remediation::Split,
            });
        }
        split_spans(&mut block.children, max, path, log);
        path.pop();
    }
}

fn pad_rows(blocks: &mut [FormattedBlock], path: &mut Vec<usize>, log: &mut Vec<Violation>) {
    for (i, block) in blocks.iter_mut().enumerate() {
        path.push(i);
        if let Payload::Table { width, .. } = block.payload {
            for (r, row) in block.children.iter_mut().enumerate() {
                if let Payload::TableRow { cells } = &mut row.payload
                    && cells.len() < width
                {
                    let mut row_path = path.clone();
                    row_path.push(r);
                    log.push(Violation {
                        path: row_path,
                        block_type: Some(BlockType::TableRow),
                        limit: Limit::TableWidth {
                            actual: cells.len(),
                            expected: width,
                        },
                        remediation: Remediation::Pad,
                    });
                    cells.resize(width, Vec::new());
                }
            }
        } else {
            pad_rows(&mut block.children, path, log);
        }
        path.pop();
    }
}

/// Logs what is still out of bounds after remediation.
fn report_unfixable(blocks: &[FormattedBlock], limits: &DestinationLimits, log: &mut Vec<Violation>) {
    let leftovers = validate(blocks, limits)
        .violations
        .into_iter()
        .filter(|v| v.remediation == Remediation::None);
    for v in leftovers {
        log::debug!("unfixable {:?} at {:?}", v.limit, v.path);
        log.push(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{inline::plain_text, parse};
    use pretty_assertions::assert_eq;

    fn types(blocks: &[FormattedBlock]) -> Vec<&'static str> {
        blocks.iter().map(|b| b.block_type.as_str()).collect()
    }

    fn formatted(text: &str) -> FormattedDocument {
        Formatter::new(FormatOptions::default())
            .expect("default options are valid")
            .format(&parse(text))
    }

    #[test]
    fn maps_node_kinds_to_block_types() {
        let doc = formatted(
            "# Title\n\n- one\n1. two\n- [x] done\n\n> [!warning] Careful\n\n---\n\n```rs\nfn main() {}\n```",
        );
        assert_eq!(
            types(&doc.blocks),
            vec![
                "heading_1",
                "bulleted_list_item",
                "numbered_list_item",
                "to_do",
                "callout",
                "divider",
                "code"
            ]
        );
        assert_eq!(doc.blocks[3].payload, Payload::ToDo { checked: true });
        assert_eq!(
            doc.blocks[6].payload,
            Payload::Code {
                language: "rust".into()
            }
        );
        assert_eq!(plain_text(&doc.blocks[6].rich_text), "fn main() {}");
    }

    #[test]
    fn code_without_language_is_plain_text() {
        let doc = formatted("```\nx\n```");
        assert_eq!(
            doc.blocks[0].payload,
            Payload::Code {
                language: PLAIN_TEXT_LANGUAGE.into()
            }
        );
    }

    #[test]
    fn long_span_split_without_loss() {
        let text = "word ".repeat(1000);
        let doc = formatted(&text);
        let spans = &doc.blocks[0].rich_text;
        assert!(spans.len() >= 3);
        assert!(spans.iter().all(|s| s.char_len() <= 2000));
        assert_eq!(plain_text(spans), text.trim_end());
        assert_eq!(doc.remediations[0].remediation, Remediation::Split);
        assert!(validate(&doc.blocks, &DestinationLimits::default()).is_valid);
    }

    #[test]
    fn many_blocks_are_chunked() {
        let text: Vec<String> = (0..250).map(|i| format!("- item {i}")).collect();
        let doc = formatted(&text.join("\n"));
        assert_eq!(doc.chunks, vec![0..100, 100..200, 200..250]);
        for chunk in doc.chunk_slices() {
            assert!(validate(chunk, &DestinationLimits::default()).is_valid);
        }
        assert!(!validate(&doc.blocks, &DestinationLimits::default()).is_valid);
    }

    #[test]
    fn deep_lists_are_flattened() {
        let doc = formatted("- a\n  - b\n    - c\n      - d");
        assert_eq!(doc.blocks.len(), 1);
        let b = &doc.blocks[0].children[0];
        let c = &b.children[0];
        assert!(c.children.is_empty());
        assert_eq!(b.children.len(), 2);
        assert_eq!(plain_text(&b.children[1].rich_text), "d");
        assert!(
            doc.remediations
                .iter()
                .any(|v| v.remediation == Remediation::Flatten)
        );
    }

    #[test]
    fn whitespace_collapses_outside_code() {
        let doc = formatted("a    lot  of\tspace `keep   this`");
        let spans = &doc.blocks[0].rich_text;
        assert_eq!(spans[0].text, "a lot of space ");
        assert_eq!(spans[1].text, "keep   this");
    }

    #[test]
    fn edge_trim_skips_equation_spans() {
        let equation = |text: &str| RichTextSpan {
            text: text.into(),
            equation: true,
            ..RichTextSpan::default()
        };
        let mut spans = vec![equation(" a + b"), RichTextSpan::plain(" and  more "), equation("c ")];
        normalize_spans(&mut spans);
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec![" a + b", " and more ", "c "]);
    }

    #[test]
    fn empty_blocks_are_dropped() {
        let doc = formatted("# \n\nbody");
        assert_eq!(types(&doc.blocks), vec!["paragraph"]);
        assert_eq!(doc.remediations[0].remediation, Remediation::DropIfEmpty);
    }

    #[test]
    fn multiline_quotes_split_when_enabled() {
        let options = FormatOptions {
            split_multiline_quotes: true,
            ..FormatOptions::default()
        };
        let node = AstNode::new(NodeKind::Quote, "first\nsecond");
        let doc = format(&[node.clone()], &options).expect("valid options");
        assert_eq!(types(&doc.blocks), vec!["quote", "quote"]);
        assert_eq!(plain_text(&doc.blocks[1].rich_text), "second");

        let kept = format(&[node], &FormatOptions::default()).expect("valid options");
        assert_eq!(kept.blocks.len(), 1);
    }

    #[test]
    fn tables_become_rows() {
        let doc = formatted("| a | b |\n| --- | --- |\n| **1** | 2 |");
        let table = &doc.blocks[0];
        assert_eq!(
            table.payload,
            Payload::Table {
                width: 2,
                has_column_header: true
            }
        );
        assert_eq!(types(&table.children), vec!["table_row", "table_row"]);
        let Payload::TableRow { cells } = &table.children[1].payload else {
            panic!("expected a row");
        };
        assert!(cells[0][0].bold);
    }

    #[test]
    fn long_equation_is_reported() {
        let node = AstNode::new(NodeKind::Equation { is_block: true }, "x".repeat(1200));
        let doc = format(&[node], &FormatOptions::default()).expect("valid options");
        assert_eq!(doc.blocks.len(), 1);
        assert!(matches!(
            doc.remediations[0].limit,
            Limit::EquationLength { actual: 1200, .. }
        ));
    }

    #[test]
    fn limits_off_keeps_one_chunk() {
        let options = FormatOptions {
            enforce_block_limits: false,
            ..FormatOptions::default()
        };
        let nodes: Vec<_> = (0..150).map(|i| AstNode::paragraph(i.to_string())).collect();
        let doc = format(&nodes, &options).expect("valid options");
        assert_eq!(doc.chunks, vec![0..150]);
    }

    #[test]
    fn bad_limits_are_rejected() {
        let options = FormatOptions {
            limits: DestinationLimits {
                max_nesting_depth: 20,
                ..DestinationLimits::default()
            },
            ..FormatOptions::default()
        };
        assert!(matches!(
            Formatter::new(options),
            Err(OptionsError::NestingDepth { got: 20, .. })
        ));
    }
}

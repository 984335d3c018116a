//! Destination limits and the remediations that bring blocks within them.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{error::OptionsError, parsing::inline::RichTextSpan};

use super::types::{BlockType, FormattedBlock, Limit, Payload, Remediation, Violation};

/// Deepest nesting limit accepted from configuration.
pub const MAX_NESTING_LIMIT: usize = 8;

/// Hard limits of the destination document API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationLimits {
    pub max_blocks_per_request: usize,
    /// Characters per rich-text span.
    pub max_rich_text_length: usize,
    /// Ancestors a block may have; top-level blocks are at depth 0.
    pub max_nesting_depth: usize,
    pub max_equation_length: usize,
}

impl Default for DestinationLimits {
    fn default() -> Self {
        Self {
            max_blocks_per_request: 100,
            max_rich_text_length: 2000,
            max_nesting_depth: 2,
            max_equation_length: 1000,
        }
    }
}

impl DestinationLimits {
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (name, value) in [
            ("max_blocks_per_request", self.max_blocks_per_request),
            ("max_rich_text_length", self.max_rich_text_length),
            ("max_equation_length", self.max_equation_length),
        ] {
            if value == 0 {
                return Err(OptionsError::ZeroLimit { name });
            }
        }
        if self.max_nesting_depth > MAX_NESTING_LIMIT {
            return Err(OptionsError::NestingDepth {
                got: self.max_nesting_depth,
                max: MAX_NESTING_LIMIT,
            });
        }
        Ok(())
    }
}

/// Splits spans longer than `max` characters into consecutive spans of the
/// same style. Concatenated text is unchanged.
///
/// Cuts prefer the last whitespace in the second half of a window.
pub fn split_long_spans(spans: &mut Vec<RichTextSpan>, max: usize) -> usize {
    if spans.iter().all(|s| s.char_len() <= max) {
        return 0;
    }
    let mut splits = 0;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if span.char_len() <= max {
            out.push(span);
            continue;
        }
        splits += 1;
        let mut rest = span.text.as_str();
        while !rest.is_empty() {
            let cut = cut_point(rest, max);
            out.push(span.with_text(&rest[..cut]));
            rest = &rest[cut..];
        }
    }
    *spans = out;
    splits
}

/// Byte index ending a piece of at most `max` characters.
fn cut_point(s: &str, max: usize) -> usize {
    let Some((hard, _)) = s.char_indices().nth(max) else {
        return s.len();
    };
    let window = &s[..hard];
    let half = window
        .char_indices()
        .nth(max / 2)
        .map(|(i, _)| i)
        .unwrap_or_default();
    match window.rfind(char::is_whitespace) {
        Some(ws) if ws >= half => ws + window[ws..].chars().next().map_or(1, char::len_utf8),
        _ => hard,
    }
}

/// Lifts blocks nested deeper than `max_depth` so they follow their
/// deepest allowed ancestor as siblings, in document order.
pub fn flatten_depth(blocks: Vec<FormattedBlock>, max_depth: usize, log: &mut Vec<Violation>) -> Vec<FormattedBlock> {
    flatten_at(blocks, 0, max_depth, &mut Vec::new(), log)
}

fn flatten_at(
    blocks: Vec<FormattedBlock>,
    depth: usize,
    max_depth: usize,
    path: &mut Vec<usize>,
    log: &mut Vec<Violation>,
) -> Vec<FormattedBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    for (i, mut block) in blocks.into_iter().enumerate() {
        path.push(i);
        if block.block_type == BlockType::Table {
            out.push(block);
        } else if depth >= max_depth && !block.children.is_empty() {
            let lifted = std::mem::take(&mut block.children);
            log.push(Violation {
                path: path.clone(),
                block_type: Some(block.block_type),
                limit: Limit::NestingDepth {
                    actual: depth + max_child_depth(&lifted),
                    max: max_depth,
                },
                remediation: Remediation::Flatten,
            });
            out.push(block);
            preorder_into(lifted, &mut out);
        } else {
            let children = std::mem::take(&mut block.children);
            block.children = flatten_at(children, depth + 1, max_depth, path, log);
            out.push(block);
        }
        path.pop();
    }
    out
}

fn max_child_depth(children: &[FormattedBlock]) -> usize {
    children
        .iter()
        .filter(|c| c.block_type != BlockType::TableRow)
        .map(|c| 1 + max_child_depth(&c.children))
        .max()
        .unwrap_or_default()
}

fn preorder_into(blocks: Vec<FormattedBlock>, out: &mut Vec<FormattedBlock>) {
    for mut block in blocks {
        if block.block_type == BlockType::Table {
            out.push(block);
            continue;
        }
        let children = std::mem::take(&mut block.children);
        out.push(block);
        preorder_into(children, out);
    }
}

/// Breaks up non-table blocks whose subtree exceeds one request. A block
/// keeps the leading children that fit beside it; the rest follow it as
/// top-level siblings in document order, split again when still too large.
pub fn split_large_blocks(blocks: Vec<FormattedBlock>, max_blocks: usize, log: &mut Vec<Violation>) -> Vec<FormattedBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut path = Vec::new();
    for (i, block) in blocks.into_iter().enumerate() {
        path.push(i);
        split_block(block, max_blocks, &mut path, &mut out, log);
        path.pop();
    }
    out
}

fn split_block(
    mut block: FormattedBlock,
    max_blocks: usize,
    path: &mut Vec<usize>,
    out: &mut Vec<FormattedBlock>,
    log: &mut Vec<Violation>,
) {
    let count = block.flattened_count();
    if block.block_type == BlockType::Table || count <= max_blocks {
        out.push(block);
        return;
    }
    log.push(Violation {
        path: path.clone(),
        block_type: Some(block.block_type),
        limit: Limit::BlockCount {
            actual: count,
            max: max_blocks,
        },
        remediation: Remediation::Split,
    });

    let mut children = std::mem::take(&mut block.children).into_iter().enumerate().peekable();
    let mut room = max_blocks.saturating_sub(1);
    while let Some((_, child)) = children.next_if(|(_, c)| c.flattened_count() <= room) {
        room -= child.flattened_count();
        block.children.push(child);
    }
    out.push(block);
    for (c, child) in children {
        path.push(c);
        split_block(child, max_blocks, path, out, log);
        path.pop();
    }
}

/// Splits tables whose rows alone exceed one request into consecutive
/// tables; only the first keeps the column header.
pub fn split_large_tables(blocks: Vec<FormattedBlock>, max_blocks: usize, log: &mut Vec<Violation>) -> Vec<FormattedBlock> {
    let rows_per_table = max_blocks.saturating_sub(1).max(1);
    let mut out = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.into_iter().enumerate() {
        let Payload::Table {
            width,
            has_column_header,
        } = block.payload
        else {
            out.push(block);
            continue;
        };
        if block.flattened_count() <= max_blocks {
            out.push(block);
            continue;
        }
        log.push(Violation {
            path: vec![i],
            block_type: Some(BlockType::Table),
            limit: Limit::BlockCount {
                actual: block.flattened_count(),
                max: max_blocks,
            },
            remediation: Remediation::Split,
        });
        let mut rows = block.children.into_iter().peekable();
        let mut first = true;
        while rows.peek().is_some() {
            let mut part = FormattedBlock::new(
                BlockType::Table,
                Payload::Table {
                    width,
                    has_column_header: has_column_header && first,
                },
            );
            part.children = rows.by_ref().take(rows_per_table).collect();
            out.push(part);
            first = false;
        }
    }
    out
}

/// Packs top-level blocks into request chunks of at most `max_blocks`
/// flattened blocks. A block larger than a whole request, which only
/// happens when splitting is skipped, gets its own chunk.
pub fn chunk_ranges(blocks: &[FormattedBlock], max_blocks: usize) -> Vec<Range<usize>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, block) in blocks.iter().enumerate() {
        let size = block.flattened_count();
        if used > 0 && used + size > max_blocks {
            chunks.push(start..i);
            start = i;
            used = 0;
        }
        used += size;
    }
    if start < blocks.len() {
        chunks.push(start..blocks.len());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::inline::plain_text;

    fn para(text: &str) -> FormattedBlock {
        FormattedBlock::new(BlockType::Paragraph, Payload::None).with_text(vec![RichTextSpan::plain(text)])
    }

    fn bullet(text: &str, children: Vec<FormattedBlock>) -> FormattedBlock {
        let mut block = FormattedBlock::new(BlockType::BulletedListItem, Payload::None)
            .with_text(vec![RichTextSpan::plain(text)]);
        block.children = children;
        block
    }

    #[test]
    fn five_thousand_chars_split_without_loss() {
        let original = "x".repeat(5000);
        let mut spans = vec![RichTextSpan::plain(original.clone())];
        assert_eq!(split_long_spans(&mut spans, 2000), 1);
        assert_eq!(spans.len(), 3);
        assert!(spans.iter().all(|s| s.char_len() <= 2000));
        assert_eq!(plain_text(&spans), original);
    }

    #[test]
    fn split_prefers_whitespace_and_keeps_style() {
        let text = format!("{} {}", "a".repeat(15), "b".repeat(8));
        let mut spans = vec![RichTextSpan {
            text: text.clone(),
            bold: true,
            ..RichTextSpan::default()
        }];
        split_long_spans(&mut spans, 20);
        assert_eq!(spans[0].text, format!("{} ", "a".repeat(15)));
        assert!(spans.iter().all(|s| s.bold));
        assert_eq!(plain_text(&spans), text);
    }

    #[test]
    fn split_counts_characters_not_bytes() {
        let original = "é".repeat(30);
        let mut spans = vec![RichTextSpan::plain(original.clone())];
        split_long_spans(&mut spans, 10);
        assert_eq!(spans.len(), 3);
        assert_eq!(plain_text(&spans), original);
    }

    #[test]
    fn deep_blocks_are_lifted() {
        let tree = vec![bullet(
            "a",
            vec![bullet("b", vec![bullet("c", vec![bullet("d", vec![])])])],
        )];
        let mut log = Vec::new();
        let flat = flatten_depth(tree, 1, &mut log);
        assert_eq!(flat.len(), 1);
        let b_level: Vec<_> = flat[0]
            .children
            .iter()
            .map(|c| plain_text(&c.rich_text))
            .collect();
        assert_eq!(b_level, vec!["b", "c", "d"]);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].path, vec![0, 0]);
        assert_eq!(log[0].remediation, Remediation::Flatten);
    }

    #[test]
    fn chunks_respect_request_size() {
        let blocks: Vec<_> = (0..250).map(|i| para(&i.to_string())).collect();
        let chunks = chunk_ranges(&blocks, 100);
        assert_eq!(chunks, vec![0..100, 100..200, 200..250]);
    }

    #[test]
    fn nested_blocks_count_toward_chunks() {
        let blocks = vec![
            bullet("a", (0..60).map(|i| para(&i.to_string())).collect()),
            bullet("b", (0..60).map(|i| para(&i.to_string())).collect()),
        ];
        assert_eq!(chunk_ranges(&blocks, 100), vec![0..1, 1..2]);
    }

    #[test]
    fn oversized_list_keeps_what_fits_and_lifts_the_rest() {
        let children: Vec<_> = (0..150).map(|i| bullet(&i.to_string(), vec![])).collect();
        let mut log = Vec::new();
        let blocks = split_large_blocks(vec![bullet("parent", children)], 100, &mut log);

        assert_eq!(blocks.len(), 52);
        assert_eq!(blocks[0].children.len(), 99);
        assert_eq!(plain_text(&blocks[1].rich_text), "99");
        assert!(blocks.iter().all(|b| b.flattened_count() <= 100));
        assert_eq!(chunk_ranges(&blocks, 100), vec![0..1, 1..52]);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].remediation, Remediation::Split);
        assert_eq!(log[0].path, vec![0]);
    }

    #[test]
    fn lifted_child_is_split_again() {
        let big = bullet("big", (0..120).map(|i| para(&i.to_string())).collect());
        let mut log = Vec::new();
        let blocks = split_large_blocks(vec![bullet("top", vec![para("first"), big])], 100, &mut log);

        assert_eq!(blocks[0].children.len(), 1);
        assert_eq!(plain_text(&blocks[1].rich_text), "big");
        assert_eq!(blocks[1].children.len(), 99);
        assert!(blocks.iter().all(|b| b.flattened_count() <= 100));
        let paths: Vec<_> = log.iter().map(|v| v.path.clone()).collect();
        assert_eq!(paths, vec![vec![0], vec![0, 1]]);
    }

    #[test]
    fn large_tables_split_into_parts() {
        let mut table = FormattedBlock::new(
            BlockType::Table,
            Payload::Table {
                width: 1,
                has_column_header: true,
            },
        );
        table.children = (0..250)
            .map(|_| FormattedBlock::new(BlockType::TableRow, Payload::TableRow { cells: vec![vec![]] }))
            .collect();
        let mut log = Vec::new();
        let parts = split_large_tables(vec![table], 100, &mut log);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.flattened_count() <= 100));
        assert!(matches!(
            parts[1].payload,
            Payload::Table {
                has_column_header: false,
                ..
            }
        ));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let limits = DestinationLimits {
            max_rich_text_length: 0,
            ..DestinationLimits::default()
        };
        assert_eq!(
            limits.validate(),
            Err(OptionsError::ZeroLimit {
                name: "max_rich_text_length"
            })
        );
    }
}

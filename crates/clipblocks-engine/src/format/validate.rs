//! Pure limit checks over formatted blocks.

use super::{
    limits::DestinationLimits,
    types::{BlockType, FormattedBlock, Limit, Payload, Remediation, ValidationResult, Violation},
};

/// Reports every limit the block set breaks, as-is. Never mutates.
///
/// Each violation carries the remediation the formatter applies for it, or
/// [`Remediation::None`] when the content cannot be fixed without loss.
pub fn validate(blocks: &[FormattedBlock], limits: &DestinationLimits) -> ValidationResult {
    let mut violations = Vec::new();

    let total: usize = blocks.iter().map(FormattedBlock::flattened_count).sum();
    if total > limits.max_blocks_per_request {
        violations.push(Violation {
            path: Vec::new(),
            block_type: None,
            limit: Limit::BlockCount {
                actual: total,
                max: limits.max_blocks_per_request,
            },
            remediation: Remediation::Split,
        });
    }

    let mut path = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        path.push(i);
        let count = block.flattened_count();
        if count > limits.max_blocks_per_request {
            violations.push(Violation {
                path: path.clone(),
                block_type: Some(block.block_type),
                limit: Limit::BlockCount {
                    actual: count,
                    max: limits.max_blocks_per_request,
                },
                remediation: Remediation::Split,
            });
        }
        check_block(block, 0, limits, &mut path, &mut violations);
        path.pop();
    }

    ValidationResult {
        is_valid: violations.is_empty(),
        blocks: blocks.to_vec(),
        violations,
    }
}

fn check_block(
    block: &FormattedBlock,
    depth: usize,
    limits: &DestinationLimits,
    path: &mut Vec<usize>,
    out: &mut Vec<Violation>,
) {
    let mut report = |limit, remediation| {
        out.push(Violation {
            path: path.clone(),
            block_type: Some(block.block_type),
            limit,
            remediation,
        })
    };

    if let Some(longest) = block.spans().map(|s| s.char_len()).max()
        && longest > limits.max_rich_text_length
    {
        report(
            Limit::RichTextLength {
                actual: longest,
                max: limits.max_rich_text_length,
            },
            Remediation::Split,
        );
    }

    if block.block_type != BlockType::TableRow && depth > limits.max_nesting_depth {
        report(
            Limit::NestingDepth {
                actual: depth,
                max: limits.max_nesting_depth,
            },
            Remediation::Flatten,
        );
    }

    if let Payload::Equation { expression } = &block.payload {
        let len = expression.chars().count();
        if len > limits.max_equation_length {
            report(
                Limit::EquationLength {
                    actual: len,
                    max: limits.max_equation_length,
                },
                Remediation::None,
            );
        }
    }

    if is_empty(block) {
        report(Limit::EmptyBlock, Remediation::DropIfEmpty);
    }

    // Row width is checked against the owning table.
    if let Payload::Table { width, .. } = block.payload {
        for (i, row) in block.children.iter().enumerate() {
            if let Payload::TableRow { cells } = &row.payload
                && cells.len() != width
            {
                let mut row_path = path.clone();
                row_path.push(i);
                out.push(Violation {
                    path: row_path,
                    block_type: Some(BlockType::TableRow),
                    limit: Limit::TableWidth {
                        actual: cells.len(),
                        expected: width,
                    },
                    remediation: Remediation::Pad,
                });
            }
        }
    }

    let child_depth = if block.block_type == BlockType::Table {
        depth
    } else {
        depth + 1
    };
    for (i, child) in block.children.iter().enumerate() {
        path.push(i);
        check_block(child, child_depth, limits, path, out);
        path.pop();
    }
}

/// A block with nothing to show: no text, no children and no payload
/// content.
pub(crate) fn is_empty(block: &FormattedBlock) -> bool {
    if !block.children.is_empty() {
        return false;
    }
    let blank_text = block.rich_text.iter().all(|s| s.text.trim().is_empty());
    match &block.payload {
        Payload::Equation { expression } => expression.trim().is_empty(),
        Payload::Media { url, .. } | Payload::Bookmark { url, .. } => url.trim().is_empty(),
        Payload::Table { .. } => true,
        Payload::TableRow { .. } => false,
        _ => block.block_type.is_text_bearing() && blank_text,
    }
}

use crate::{ast::AstNode, ast::NodeKind, parsing::inline::plain_text};

/// Panics with a descriptive message when a tree breaks an AST invariant.
pub fn check(nodes: &[AstNode]) {
    for node in nodes {
        assert!(
            node.kind.is_recursive() || node.children.is_empty(),
            "{} node owns {} children",
            node.type_name(),
            node.children.len()
        );
        if let Some(spans) = &node.formatting {
            assert_eq!(
                plain_text(spans),
                node.content,
                "span text does not reconstruct {} content",
                node.type_name()
            );
            for pair in spans.windows(2) {
                assert!(
                    !pair[0].same_style(&pair[1]),
                    "adjacent spans with identical style in {}",
                    node.type_name()
                );
            }
        }
        if let NodeKind::Heading { level } = node.kind {
            assert!((1..=3).contains(&level), "heading level {level} out of range");
        }
        if let NodeKind::Table(meta) = &node.kind {
            for row in &meta.rows {
                assert_eq!(row.len(), meta.width(), "ragged table row");
            }
        }
        check(&node.children);
    }
}

//! # Block Parser Registry
//!
//! A statically ordered table of block parsers. Each entry peeks at the
//! stream to decide whether it claims the current token, then consumes
//! one or more tokens to build a single [`AstNode`]. Priority is the table
//! order: the first parser that claims a token and returns a node wins.
//!
//! Callout, toggle and quote all start with `>`; they are tried in that
//! order, and the quote parser declines content that belongs to the other
//! two. A token nobody claims becomes a paragraph holding its raw text.

mod callout;
mod code;
mod divider;
mod equation;
mod heading;
mod list;
mod media;
mod paragraph;
mod quote;
pub mod quote_signals;
mod table;
mod toggle;

use crate::{
    ast::{AstNode, NodeKind},
    parsing::{
        inline::{from_markup, plain_text},
        lexer::TokenStream,
    },
};

/// One registry entry.
pub struct BlockParser {
    pub name: &'static str,
    /// Peeks only; must not consume.
    pub claims: fn(&TokenStream) -> bool,
    /// May return `None` to defer; the registry rewinds the stream.
    pub parse: fn(&mut TokenStream) -> Option<AstNode>,
}

/// Parsers in descending priority.
pub static REGISTRY: &[BlockParser] = &[
    BlockParser {
        name: "callout",
        claims: callout::claims,
        parse: callout::parse,
    },
    BlockParser {
        name: "toggle",
        claims: toggle::claims,
        parse: toggle::parse,
    },
    BlockParser {
        name: "quote",
        claims: quote::claims,
        parse: quote::parse,
    },
    BlockParser {
        name: "code",
        claims: code::claims,
        parse: code::parse,
    },
    BlockParser {
        name: "equation",
        claims: equation::claims,
        parse: equation::parse,
    },
    BlockParser {
        name: "table",
        claims: table::claims,
        parse: table::parse,
    },
    BlockParser {
        name: "heading",
        claims: heading::claims,
        parse: heading::parse,
    },
    BlockParser {
        name: "divider",
        claims: divider::claims,
        parse: divider::parse,
    },
    BlockParser {
        name: "list",
        claims: list::claims,
        parse: list::parse,
    },
    BlockParser {
        name: "media",
        claims: media::claims,
        parse: media::parse,
    },
    BlockParser {
        name: "paragraph",
        claims: paragraph::claims,
        parse: paragraph::parse,
    },
];

/// Parses every remaining token of `stream` into sibling nodes.
pub fn parse_blocks(stream: &mut TokenStream) -> Vec<AstNode> {
    let mut nodes = Vec::new();
    loop {
        stream.skip_blank();
        if !stream.has_next() {
            break;
        }
        nodes.push(parse_one(stream));
    }
    nodes
}

fn parse_one(stream: &mut TokenStream) -> AstNode {
    for parser in REGISTRY {
        if !(parser.claims)(stream) {
            continue;
        }
        let mark = stream.checkpoint();
        if let Some(node) = (parser.parse)(stream) {
            log::trace!("{} parser produced {}", parser.name, node.type_name());
            return node;
        }
        log::trace!("{} parser deferred", parser.name);
        stream.rewind(mark);
    }

    let raw = stream
        .next()
        .map(|tok| tok.raw.trim().to_string())
        .unwrap_or_default();
    log::trace!("no parser claimed token, keeping raw text");
    AstNode::paragraph(raw)
}

/// Builds a text-bearing node from inline markup.
pub(crate) fn text_node(kind: NodeKind, markup: &str) -> AstNode {
    let spans = from_markup(markup);
    let mut node = AstNode::new(kind, plain_text(&spans));
    node.formatting = Some(spans);
    node
}

/// Deepest nesting the parser builds. Tokens indented below it are parsed
/// as siblings of the last node that reached it.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Parses the indented block owned by a token at `indent`.
pub(crate) fn children(stream: &mut TokenStream, indent: usize) -> Vec<AstNode> {
    if stream.depth() >= MAX_PARSE_DEPTH {
        log::debug!("nesting capped at depth {MAX_PARSE_DEPTH}");
        return Vec::new();
    }
    let mut owned = stream.take_indented(indent);
    parse_blocks(&mut owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::lexer::tokenize;

    fn types(text: &str) -> Vec<&'static str> {
        parse_blocks(&mut tokenize(text))
            .iter()
            .map(AstNode::type_name)
            .collect()
    }

    #[test]
    fn registry_order_is_callout_toggle_quote() {
        let names: Vec<_> = REGISTRY.iter().map(|p| p.name).take(3).collect();
        assert_eq!(names, vec!["callout", "toggle", "quote"]);
    }

    #[test]
    fn unclaimed_tokens_keep_raw_text() {
        let nodes = parse_blocks(&mut tokenize("only\tone row"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].type_name(), "paragraph");
        assert_eq!(nodes[0].content, "only\tone row");
        assert!(nodes[0].formatting.is_none());
    }

    #[test]
    fn shared_prefix_disambiguation() {
        assert_eq!(
            types("> [!warning] Be careful\n\n> # Folded\n\n> Said someone"),
            vec!["callout", "toggle", "quote"]
        );
    }

    #[test]
    fn staircase_list_is_capped_not_recursed() {
        let text: String = (0..1000).map(|i| format!("{}- a\n", " ".repeat(i))).collect();
        let nodes = parse_blocks(&mut tokenize(&text));
        assert_eq!(nodes.len(), 1);

        let mut levels = 1;
        let mut node = &nodes[0];
        while node.children.len() == 1 {
            node = &node.children[0];
            levels += 1;
        }
        assert_eq!(levels, MAX_PARSE_DEPTH);
        assert_eq!(node.children.len(), 1000 - MAX_PARSE_DEPTH);
        assert!(node.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn mixed_document() {
        assert_eq!(
            types("# T\n\ntext\n\n- a\n- b\n\n```\nx\n```\n\n---\n\n$$\nx\n$$"),
            vec!["heading_1", "paragraph", "list_item", "list_item", "code", "divider", "equation"]
        );
    }
}

use crate::{
    ast::{AstNode, NodeKind},
    parsing::lexer::{
        Token, TokenKind, TokenStream,
        kinds::{Admonition, Heading},
    },
};

use super::{quote_signals::looks_like_independent_quote, text_node};

/// Content owned by the callout or toggle parsers.
fn belongs_elsewhere(tok: &Token) -> bool {
    Admonition::is_marker(&tok.content) || Heading::parse(&tok.content).is_some()
}

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| matches!(tok.kind, TokenKind::Quote { .. }))
}

/// Merges a contiguous run of quote lines into one node.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let first = stream.next()?;
    if belongs_elsewhere(&first) {
        return None;
    }

    let mut lines = vec![first.content];
    while let Some(next) = stream.peek() {
        if next.quote_depth() == 0 || belongs_elsewhere(next) {
            break;
        }
        let prev = lines.last().map(String::as_str).unwrap_or_default();
        if looks_like_independent_quote(prev, &next.content) {
            break;
        }
        lines.push(next.content.clone());
        stream.next();
    }

    let markup = lines.join("\n");
    Some(text_node(NodeKind::Quote, markup.trim()))
}

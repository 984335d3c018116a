use crate::{
    ast::{AstNode, NodeKind},
    parsing::lexer::{TokenKind, TokenStream},
};

use super::text_node;

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| tok.kind == TokenKind::Paragraph)
}

/// Consecutive plain lines at the same indentation form one paragraph.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let first = stream.next()?;
    let mut lines = vec![first.content];
    while let Some(next) = stream.peek() {
        if next.kind != TokenKind::Paragraph || next.indent != first.indent {
            break;
        }
        lines.push(next.content.clone());
        stream.next();
    }
    Some(text_node(NodeKind::Paragraph, &lines.join("\n")))
}

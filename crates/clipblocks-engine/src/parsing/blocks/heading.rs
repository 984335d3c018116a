use crate::{
    ast::{AstNode, NodeKind},
    parsing::lexer::{TokenKind, TokenStream},
};

use super::text_node;

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| matches!(tok.kind, TokenKind::Heading { .. }))
}

/// Levels 4 to 6 fold into level 3.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let TokenKind::Heading { level } = tok.kind else {
        return None;
    };
    let kind = NodeKind::Heading {
        level: level.clamp(1, 3),
    };
    Some(text_node(kind, &tok.content))
}

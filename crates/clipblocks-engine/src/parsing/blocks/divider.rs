use crate::{
    ast::AstNode,
    parsing::lexer::{TokenKind, TokenStream},
};

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| tok.kind == TokenKind::Divider)
}

pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    stream.next()?;
    Some(AstNode::divider())
}

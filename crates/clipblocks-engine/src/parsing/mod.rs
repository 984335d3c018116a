//! # Parsing
//!
//! Markup text to [`AstNode`]s in two phases: the [`lexer`] turns lines
//! into tokens, then the [`blocks`] registry turns tokens into nodes.
//! Text-bearing nodes get their inline formatting from [`inline`].

pub mod blocks;
pub mod inline;
pub mod lexer;
pub mod snapshot;

use crate::ast::AstNode;

use lexer::{LexOptions, TokenStream, tokenize_with};

/// Parses markup into top-level nodes. Never fails on content.
pub fn parse(text: &str) -> Vec<AstNode> {
    parse_with(text, &LexOptions::default())
}

pub fn parse_with(text: &str, options: &LexOptions) -> Vec<AstNode> {
    let mut stream = tokenize_with(text, options);
    parse_tokens(&mut stream)
}

pub fn parse_tokens(stream: &mut TokenStream) -> Vec<AstNode> {
    let nodes = blocks::parse_blocks(stream);
    log::debug!("parsed {} top-level nodes", nodes.len());
    nodes
}

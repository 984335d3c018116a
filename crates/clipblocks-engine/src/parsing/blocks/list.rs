use crate::{
    ast::{AstNode, ListItemMeta, NodeKind},
    parsing::lexer::{TokenKind, TokenStream},
};

use super::{children, text_node};

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| matches!(tok.kind, TokenKind::ListItem { .. }))
}

/// One item plus everything indented deeper than its marker. Indented
/// plain lines directly under the item continue its text; after a blank
/// line they start its children.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let TokenKind::ListItem {
        list_type,
        checked,
        number,
    } = tok.kind
    else {
        return None;
    };
    let meta = ListItemMeta {
        list_type,
        checked,
        is_toggleable: false,
        number,
    };
    let mut lines = vec![tok.content];
    while let Some(next) = stream.peek() {
        if next.kind != TokenKind::Paragraph || next.indent <= tok.indent {
            break;
        }
        lines.push(next.content.clone());
        stream.next();
    }
    let node = text_node(NodeKind::ListItem(meta), &lines.join("\n"));
    Some(node.with_children(children(stream, tok.indent)))
}

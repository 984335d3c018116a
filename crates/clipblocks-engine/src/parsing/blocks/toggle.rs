use crate::{
    ast::{AstNode, ListItemMeta, NodeKind},
    parsing::lexer::{
        Token, TokenKind, TokenStream,
        kinds::{Admonition, Heading, ListMarker},
    },
};

use super::{children, text_node};

/// What a claimed `>` line or `▶` marker turns into.
enum Shape<'a> {
    Heading(u8, &'a str),
    ListItem(ListMarker),
    Plain,
}

fn shape(tok: &Token) -> Shape<'_> {
    if let Some((level, text)) = Heading::parse(&tok.content) {
        return Shape::Heading(level, text);
    }
    if let Some(marker) = ListMarker::parse(&tok.content) {
        return Shape::ListItem(marker);
    }
    Shape::Plain
}

fn has_indented_children(stream: &TokenStream, tok: &Token) -> bool {
    stream
        .peek_nth(1)
        .is_some_and(|next| !next.is_blank() && next.indent > tok.indent && next.quote_depth() == 0)
}

pub fn claims(stream: &TokenStream) -> bool {
    let Some(tok) = stream.peek() else {
        return false;
    };
    match tok.kind {
        TokenKind::Toggle => true,
        TokenKind::Quote { depth } => {
            if Admonition::is_marker(&tok.content) {
                return false;
            }
            match shape(tok) {
                Shape::Heading(..) => true,
                Shape::ListItem(_) => depth == 1,
                Shape::Plain => depth == 1 && has_indented_children(stream, tok),
            }
        }
        _ => false,
    }
}

pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let node = match (&tok.kind, shape(&tok)) {
        (TokenKind::Toggle, _) | (TokenKind::Quote { .. }, Shape::Plain) => {
            text_node(NodeKind::Toggle { heading_level: None }, &tok.content)
        }
        (TokenKind::Quote { .. }, Shape::Heading(level, text)) => text_node(
            NodeKind::Toggle {
                heading_level: Some(level.clamp(1, 3)),
            },
            text,
        ),
        (TokenKind::Quote { .. }, Shape::ListItem(marker)) => {
            let meta = ListItemMeta {
                list_type: marker.list_type,
                checked: marker.checked,
                is_toggleable: true,
                number: marker.number,
            };
            text_node(
                NodeKind::ListItem(meta),
                &tok.content[marker.content_offset..],
            )
        }
        _ => return None,
    };
    Some(node.with_children(children(stream, tok.indent)))
}

#[cfg(test)]
mod tests {
    use crate::ast::{ListType, NodeKind};
    use crate::parsing::{blocks::parse_blocks, lexer::tokenize};

    #[test]
    fn quote_with_indented_children_is_toggle() {
        let nodes = parse_blocks(&mut tokenize("> Summary\n  hidden detail\n  - item"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Toggle { heading_level: None });
        assert_eq!(nodes[0].content, "Summary");
        let kinds: Vec<_> = nodes[0].children.iter().map(|c| c.type_name()).collect();
        assert_eq!(kinds, vec!["paragraph", "list_item"]);
    }

    #[test]
    fn quoted_heading_is_heading_toggle() {
        let nodes = parse_blocks(&mut tokenize("> ## Section\n  body"));
        assert_eq!(
            nodes[0].kind,
            NodeKind::Toggle {
                heading_level: Some(2)
            }
        );
        assert_eq!(nodes[0].children.len(), 1);
    }

    #[test]
    fn deep_heading_levels_clamp() {
        let nodes = parse_blocks(&mut tokenize("> #### Four"));
        assert_eq!(
            nodes[0].kind,
            NodeKind::Toggle {
                heading_level: Some(3)
            }
        );
    }

    #[test]
    fn quoted_list_item_is_toggleable() {
        let nodes = parse_blocks(&mut tokenize("> - [x] Done\n  - child"));
        match &nodes[0].kind {
            NodeKind::ListItem(meta) => {
                assert!(meta.is_toggleable);
                assert_eq!(meta.list_type, ListType::Todo);
                assert_eq!(meta.checked, Some(true));
            }
            other => panic!("expected list item, got {other:?}"),
        }
        assert_eq!(nodes[0].content, "Done");
        assert_eq!(nodes[0].children.len(), 1);
    }

    #[test]
    fn triangle_marker_is_toggle() {
        let nodes = parse_blocks(&mut tokenize("▶ More\n    inside"));
        assert_eq!(nodes[0].type_name(), "toggle");
        assert_eq!(nodes[0].children[0].content, "inside");
    }
}

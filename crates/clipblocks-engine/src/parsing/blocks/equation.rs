use crate::{
    ast::{AstNode, NodeKind},
    parsing::lexer::{TokenKind, TokenStream},
};

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| matches!(tok.kind, TokenKind::Equation { .. }))
}

/// `$$`/environment blocks are block equations; a lone `$x$` line is inline.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let TokenKind::Equation { display } = tok.kind else {
        return None;
    };
    Some(AstNode::new(NodeKind::Equation { is_block: display }, tok.content))
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::parsing::{blocks::parse_blocks, lexer::tokenize};

    #[test]
    fn delimiter_count_sets_block_flag() {
        let nodes = parse_blocks(&mut tokenize("$$E = mc^2$$\n\n$a + b$"));
        assert_eq!(nodes[0].kind, NodeKind::Equation { is_block: true });
        assert_eq!(nodes[0].content, "E = mc^2");
        assert_eq!(nodes[1].kind, NodeKind::Equation { is_block: false });
        assert_eq!(nodes[1].content, "a + b");
    }
}

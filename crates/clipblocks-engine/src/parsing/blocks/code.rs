use crate::{
    ast::{AstNode, NodeKind},
    classify::language,
    parsing::lexer::{TokenKind, TokenStream},
};

pub fn claims(stream: &TokenStream) -> bool {
    stream
        .peek()
        .is_some_and(|tok| matches!(tok.kind, TokenKind::CodeBlock { .. }))
}

pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let TokenKind::CodeBlock { language: hint, .. } = tok.kind else {
        return None;
    };
    let kind = NodeKind::Code {
        language: hint.as_deref().map(language::normalize),
        is_block: true,
    };
    Some(AstNode::new(kind, tok.content))
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::parsing::{blocks::parse_blocks, lexer::tokenize};

    #[test]
    fn fence_hint_is_normalized() {
        let nodes = parse_blocks(&mut tokenize("```JS\nlet a = 1;\n```"));
        assert_eq!(
            nodes[0].kind,
            NodeKind::Code {
                language: Some("javascript".into()),
                is_block: true
            }
        );
        assert_eq!(nodes[0].content, "let a = 1;");
        assert!(nodes[0].formatting.is_none());
    }

    #[test]
    fn markup_inside_code_is_untouched() {
        let nodes = parse_blocks(&mut tokenize("```\n**not bold**\n```"));
        assert_eq!(nodes[0].content, "**not bold**");
    }
}

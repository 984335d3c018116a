use crate::{
    ast::{AstNode, CalloutMeta, NodeKind},
    parsing::lexer::{
        CalloutSource, TokenKind, TokenStream,
        kinds::{Admonition, Heading},
    },
};

use super::text_node;

pub fn claims(stream: &TokenStream) -> bool {
    stream.peek().is_some_and(|tok| match &tok.kind {
        TokenKind::Callout { .. } => true,
        TokenKind::Quote { .. } => Admonition::is_marker(&tok.content),
        _ => false,
    })
}

pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let (callout_type, icon, title, source, depth) = match tok.kind {
        TokenKind::Callout {
            callout_type,
            source,
            icon,
        } => (callout_type, icon, tok.content, source, 1),
        TokenKind::Quote { depth } => {
            let (callout_type, title) = Admonition::parse(&tok.content)?;
            (callout_type, None, title.to_string(), CalloutSource::Markup, depth)
        }
        _ => return None,
    };

    let mut lines = Vec::new();
    if !title.is_empty() {
        lines.push(title);
    }
    if source == CalloutSource::Markup {
        while let Some(next) = stream.peek() {
            let continues = next.quote_depth() == depth
                && !Admonition::is_marker(&next.content)
                && Heading::parse(&next.content).is_none();
            if !continues {
                break;
            }
            lines.push(next.content.clone());
            stream.next();
        }
    }

    let (default_icon, color) = Admonition::style(&callout_type);
    let meta = CalloutMeta {
        icon: icon.unwrap_or_else(|| default_icon.to_string()),
        color: color.to_string(),
        callout_type,
    };
    Some(text_node(NodeKind::Callout(meta), lines.join("\n").trim()))
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::parsing::{blocks::parse_blocks, lexer::tokenize};

    fn meta(text: &str) -> (String, String, String, String) {
        let nodes = parse_blocks(&mut tokenize(text));
        match &nodes[0].kind {
            NodeKind::Callout(m) => (
                m.callout_type.clone(),
                m.icon.clone(),
                m.color.clone(),
                nodes[0].content.clone(),
            ),
            other => panic!("expected callout, got {other:?}"),
        }
    }

    #[test]
    fn warning_resolves_icon_and_color() {
        assert_eq!(
            meta("> [!warning] Be careful"),
            (
                "warning".into(),
                "⚠️".into(),
                "yellow".into(),
                "Be careful".into()
            )
        );
    }

    #[test]
    fn unknown_type_falls_back_to_note_style() {
        let (kind, icon, color, _) = meta("> [!custom] Hi");
        assert_eq!((kind.as_str(), icon.as_str(), color.as_str()), ("custom", "📝", "gray"));
    }

    #[test]
    fn body_lines_are_absorbed() {
        let (_, _, _, content) = meta("> [!tip] Title\n> first **line**\n> second");
        assert_eq!(content, "Title\nfirst line\nsecond");
    }

    #[test]
    fn body_stops_at_next_marker() {
        let nodes = parse_blocks(&mut tokenize("> [!note] A\n> [!tip] B"));
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn html_aside_keeps_its_icon() {
        let (kind, icon, color, content) = meta("<aside>\n🚨 Do not deploy\n</aside>");
        assert_eq!(kind, "danger");
        assert_eq!(icon, "🚨");
        assert_eq!(color, "red");
        assert_eq!(content, "Do not deploy");
    }

    #[test]
    fn nested_quote_marker_is_still_a_callout() {
        let (kind, ..) = meta(">> [!info] Deep");
        assert_eq!(kind, "info");
    }
}

use crate::{
    ast::{AstNode, MediaKind, MediaMeta, NodeKind},
    classify::url::media_kind,
    parsing::lexer::{TokenKind, TokenStream},
};

pub fn claims(stream: &TokenStream) -> bool {
    stream.peek().is_some_and(|tok| {
        matches!(tok.kind, TokenKind::Image { .. } | TokenKind::LinkLine { .. })
    })
}

/// Images always become image blocks; a lone link becomes embedded media
/// when its URL points at media, and a bookmark otherwise.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let tok = stream.next()?;
    let node = match tok.kind {
        TokenKind::Image { alt, url } => media(MediaKind::Image, url, alt),
        TokenKind::LinkLine { title, url } => match media_kind(&url) {
            Some(kind) => media(kind, url, title.unwrap_or_default()),
            None => AstNode::new(NodeKind::Bookmark { url, title }, ""),
        },
        _ => return None,
    };
    Some(node)
}

fn media(kind: MediaKind, url: String, caption: String) -> AstNode {
    let caption = caption.trim();
    let meta = MediaMeta {
        kind,
        url,
        caption: (!caption.is_empty()).then(|| caption.to_string()),
    };
    AstNode::new(NodeKind::Media(meta), caption)
}

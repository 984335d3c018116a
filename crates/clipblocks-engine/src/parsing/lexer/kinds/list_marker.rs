use crate::ast::ListType;

/// A recognised list marker and the byte offset where item text begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    pub list_type: ListType,
    pub checked: Option<bool>,
    pub number: Option<u32>,
    pub content_offset: usize,
}

impl ListMarker {
    pub const BULLETS: [u8; 3] = [b'-', b'*', b'+'];
    pub const TODO_OPEN: &'static str = "[ ]";
    pub const TODO_DONE: [&'static str; 2] = ["[x]", "[X]"];

    /// Parses a marker at the start of an indent-stripped line.
    pub fn parse(rest: &str) -> Option<ListMarker> {
        let b = rest.as_bytes();
        let first = *b.first()?;

        if Self::BULLETS.contains(&first) {
            let after = rest.get(1..)?;
            if !(after.is_empty() || after.starts_with(' ') || after.starts_with('\t')) {
                return None;
            }
            let text_at = 1 + (after.len() - after.trim_start().len());
            let text = &rest[text_at..];
            if let Some(checked) = Self::todo_box(text) {
                let box_end = text_at + 3;
                let pad = rest[box_end..].len() - rest[box_end..].trim_start().len();
                return Some(ListMarker {
                    list_type: ListType::Todo,
                    checked: Some(checked),
                    number: None,
                    content_offset: box_end + pad,
                });
            }
            return Some(ListMarker {
                list_type: ListType::Bulleted,
                checked: None,
                number: None,
                content_offset: text_at,
            });
        }

        let digits = b.iter().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        if !matches!(b.get(digits), Some(b'.') | Some(b')')) {
            return None;
        }
        let after = &rest[digits + 1..];
        if !(after.is_empty() || after.starts_with(' ') || after.starts_with('\t')) {
            return None;
        }
        let number = rest[..digits].parse().ok()?;
        Some(ListMarker {
            list_type: ListType::Numbered,
            checked: None,
            number: Some(number),
            content_offset: digits + 1 + (after.len() - after.trim_start().len()),
        })
    }

    fn todo_box(text: &str) -> Option<bool> {
        let done = Self::TODO_DONE.iter().any(|m| text.starts_with(m));
        if !done && !text.starts_with(Self::TODO_OPEN) {
            return None;
        }
        match text.as_bytes().get(3) {
            None | Some(b' ') | Some(b'\t') => Some(done),
            _ => None,
        }
    }
}

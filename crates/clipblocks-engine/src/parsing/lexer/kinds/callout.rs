/// Admonition markers (`> [!warning]`) and the fixed type→style lookup.
pub struct Admonition;

/// `(type, icon, color)`; the first row is the fallback for unknown types.
const STYLES: &[(&str, &str, &str)] = &[
    ("note", "📝", "gray"),
    ("info", "ℹ️", "blue"),
    ("tip", "💡", "green"),
    ("hint", "💡", "green"),
    ("important", "❗", "purple"),
    ("warning", "⚠️", "yellow"),
    ("caution", "⚠️", "orange"),
    ("danger", "🚨", "red"),
    ("error", "❌", "red"),
    ("success", "✅", "green"),
    ("question", "❓", "blue"),
    ("quote", "💬", "gray"),
    ("example", "📋", "purple"),
    ("bug", "🐛", "red"),
];

impl Admonition {
    pub const OPEN: &'static str = "[!";
    pub const CLOSE: char = ']';
    pub const DEFAULT_TYPE: &'static str = "note";

    /// Parses `[!type]` (with an optional `+`/`-` fold suffix) at the start
    /// of dequoted content. Returns the lowercased type and the title text.
    pub fn parse(content: &str) -> Option<(String, &str)> {
        let rest = content.trim_start().strip_prefix(Self::OPEN)?;
        let close = rest.find(Self::CLOSE)?;
        let name = &rest[..close];
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        let title = rest[close + 1..].trim_start_matches(['+', '-']).trim();
        Some((name.to_ascii_lowercase(), title))
    }

    pub fn is_marker(content: &str) -> bool {
        Self::parse(content).is_some()
    }

    /// Icon and color for a type, falling back to `note`.
    pub fn style(callout_type: &str) -> (&'static str, &'static str) {
        let row = STYLES
            .iter()
            .find(|(name, ..)| *name == callout_type)
            .unwrap_or(&STYLES[0]);
        (row.1, row.2)
    }

    /// Reverse lookup used for HTML callouts that only carry an emoji.
    pub fn type_for_icon(icon: &str) -> Option<&'static str> {
        STYLES
            .iter()
            .find(|(_, i, _)| *i == icon || i.trim_end_matches('\u{fe0f}') == icon)
            .map(|(name, ..)| *name)
    }
}

/// HTML `<aside>` callouts as produced by rich-text clipboards.
pub struct Aside;

impl Aside {
    pub const OPEN: &'static str = "<aside";
    pub const CLOSE: &'static str = "</aside>";

    pub fn opens(line: &str) -> bool {
        let t = line.trim_start();
        t.get(..Self::OPEN.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(Self::OPEN))
            && matches!(t.as_bytes().get(Self::OPEN.len()), Some(b'>') | Some(b' '))
    }

    /// Byte index of the closing tag, if the line contains one.
    pub fn close_at(line: &str) -> Option<usize> {
        line.to_ascii_lowercase().find(Self::CLOSE)
    }

    /// Splits a leading emoji off the callout body.
    pub fn leading_icon(body: &str) -> (Option<String>, &str) {
        let body = body.trim_start();
        let mut end = 0;
        for (i, c) in body.char_indices() {
            let emoji_part = c == '\u{fe0f}'
                || c == '\u{200d}'
                || matches!(c as u32, 0x2100..=0x2BFF | 0x1F000..=0x1FAFF);
            if !emoji_part {
                break;
            }
            end = i + c.len_utf8();
        }
        if end == 0 {
            return (None, body);
        }
        (Some(body[..end].to_string()), body[end..].trim_start())
    }
}

//! Inline constructs with their owned delimiters.
//!
//! The parser and the markup writer both read these constants; neither
//! hardcodes a delimiter of its own.

/// Inline code: a raw zone, nothing is parsed inside.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';
}

/// Inline math `$expr$`: also a raw zone.
pub struct InlineEquation;

impl InlineEquation {
    pub const DOLLAR: u8 = b'$';
}

/// `**strong**` / `__strong__` and `*em*` / `_em_`.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
    pub const STRONG: &'static str = "**";
    pub const EM: &'static str = "*";
}

/// `~~struck~~`.
pub struct Strikethrough;

impl Strikethrough {
    pub const TILDE: u8 = b'~';
    pub const MARKER: &'static str = "~~";
}

/// `<u>underlined</u>`; markdown has no native underline.
pub struct Underline;

impl Underline {
    pub const OPEN: &'static [u8] = b"<u>";
    pub const CLOSE: &'static [u8] = b"</u>";
}

/// `[text](url)`.
pub struct Link;

impl Link {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const URL_OPEN: u8 = b'(';
    pub const URL_CLOSE: u8 = b')';
}

/// Backslash escape of ASCII punctuation.
pub struct Escape;

impl Escape {
    pub const BACKSLASH: u8 = b'\\';
}

/// Bytes that may start an inline construct.
pub fn is_special(b: u8) -> bool {
    matches!(
        b,
        CodeSpan::TICK
            | InlineEquation::DOLLAR
            | Emphasis::STAR
            | Emphasis::UNDERSCORE
            | Strikethrough::TILDE
            | Link::OPEN
            | Escape::BACKSLASH
            | b'<'
    )
}

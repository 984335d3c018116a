use std::collections::HashMap;
use std::ops::Range;

use super::{
    cursor::Cursor,
    kinds::{self, CodeSpan, Emphasis, Escape, InlineEquation, Link, Strikethrough, Underline},
    types::RichTextSpan,
};

/// Parses inline markup into non-overlapping formatted spans.
///
/// Recognizes `**strong**`, `*em*`, `~~strike~~`, `` `code` ``, `$math$`,
/// `<u>underline</u>`, `[text](url)` and backslash escapes. Constructs nest
/// (`**bold [link](u)**`). Unclosed or malformed markers stay as literal
/// text, so concatenating the returned spans gives the input with exactly
/// the matched markers removed.
pub fn from_markup(text: &str) -> Vec<RichTextSpan> {
    let mut out = SpanSink::default();
    let mut misses = Misses::default();
    parse_range(text, 0..text.len(), &Style::default(), &mut out, &mut misses);
    out.spans
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Style {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    underline: bool,
    link: Option<String>,
}

#[derive(Default)]
struct SpanSink {
    spans: Vec<RichTextSpan>,
}

impl SpanSink {
    fn push(&mut self, text: &str, style: &Style, code: bool, equation: bool) {
        if text.is_empty() {
            return;
        }
        let span = RichTextSpan {
            text: text.to_string(),
            bold: style.bold,
            italic: style.italic,
            strikethrough: style.strikethrough,
            underline: style.underline,
            code,
            equation,
            color: None,
            link: style.link.clone(),
        };
        if let Some(last) = self.spans.last_mut()
            && last.same_style(&span)
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(span);
    }
}

/// What a delimiter search is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Closer {
    /// A run of `byte`; `width` is how many bytes the closer consumes.
    Run { byte: u8, width: usize },
    Bytes(&'static [u8]),
}

/// Closing-delimiter searches that already failed.
///
/// A search scanning `[from, end)` that finds nothing also finds nothing
/// from any later `from` with the same `end`, so one miss per closer and
/// bound is enough to keep runs of unmatched openers linear.
#[derive(Default)]
struct Misses(HashMap<(Closer, usize), usize>);

impl Misses {
    fn known_miss(&self, closer: Closer, from: usize, end: usize) -> bool {
        self.0.get(&(closer, end)).is_some_and(|&at| from >= at)
    }

    fn record(&mut self, closer: Closer, from: usize, end: usize) {
        let at = self.0.entry((closer, end)).or_insert(from);
        *at = (*at).min(from);
    }
}

enum Piece {
    /// Literal text, e.g. an escaped character.
    Text(Range<usize>),
    /// A raw zone emitted verbatim.
    Raw { text: Range<usize>, equation: bool },
    /// Inner markup parsed again with an extended style.
    Styled { inner: Range<usize>, style: Style },
}

fn parse_range(
    src: &str,
    range: Range<usize>,
    style: &Style,
    out: &mut SpanSink,
    misses: &mut Misses,
) {
    let mut cur = Cursor::bounded(src, range.start, range.end);
    let mut text_start = cur.pos();

    while let Some(b) = cur.peek() {
        if !kinds::is_special(b) {
            cur.bump_char();
            continue;
        }

        let here = cur.pos();
        let Some((piece, end)) = try_piece(&cur, style, misses) else {
            cur.bump_char();
            continue;
        };

        out.push(&src[text_start..here], style, false, false);
        match piece {
            Piece::Text(r) => out.push(&src[r], style, false, false),
            Piece::Raw { text, equation } => out.push(&src[text], style, !equation, equation),
            Piece::Styled { inner, style } => parse_range(src, inner, &style, out, misses),
        }
        cur.i = end;
        text_start = end;
    }

    out.push(&src[text_start..cur.pos().min(range.end)], style, false, false);
}

/// Tries every construct that can start at the cursor, in precedence order.
fn try_piece(cur: &Cursor<'_>, style: &Style, misses: &mut Misses) -> Option<(Piece, usize)> {
    match cur.peek()? {
        Escape::BACKSLASH => try_escape(cur),
        CodeSpan::TICK => try_code_span(cur, misses),
        InlineEquation::DOLLAR => try_equation(cur, misses),
        b'<' => try_underline(cur, style, misses),
        Emphasis::STAR | Emphasis::UNDERSCORE => try_emphasis(cur, style, misses),
        Strikethrough::TILDE => try_strikethrough(cur, style, misses),
        Link::OPEN => try_link(cur, style, misses),
        _ => None,
    }
}

fn try_escape(cur: &Cursor<'_>) -> Option<(Piece, usize)> {
    let next = cur.byte_at(cur.i + 1)?;
    if !next.is_ascii_punctuation() {
        return None;
    }
    Some((Piece::Text(cur.i + 1..cur.i + 2), cur.i + 2))
}

fn try_code_span(cur: &Cursor<'_>, misses: &mut Misses) -> Option<(Piece, usize)> {
    let width = cur.run_len(cur.i, CodeSpan::TICK);
    let from = cur.i + width;
    let close = find_exact_run(cur, from, CodeSpan::TICK, width, misses)?;
    if close == from {
        return None;
    }
    let mut inner = from..close;
    // A single padding space on both sides is not part of the code.
    let bytes = cur.s.as_bytes();
    if inner.len() >= 2 && bytes[inner.start] == b' ' && bytes[inner.end - 1] == b' ' {
        inner = inner.start + 1..inner.end - 1;
    }
    Some((
        Piece::Raw {
            text: inner,
            equation: false,
        },
        close + width,
    ))
}

fn try_equation(cur: &Cursor<'_>, misses: &mut Misses) -> Option<(Piece, usize)> {
    let start = cur.i;
    if cur.byte_at(start + 1) == Some(InlineEquation::DOLLAR) {
        let closer = Closer::Bytes(b"$$");
        let from = start + 2;
        let close = find_bytes(cur, from, closer, misses)?;
        let inner = trim_range(cur.s, from..close);
        if inner.is_empty() {
            return None;
        }
        return Some((
            Piece::Raw {
                text: inner,
                equation: true,
            },
            close + 2,
        ));
    }

    let first = cur.char_at(start + 1)?;
    if first.is_whitespace() || first.is_ascii_digit() {
        return None;
    }
    let closer = Closer::Bytes(b"$");
    let close = find_bytes(cur, start + 1, closer, misses)?;
    let before_close = cur.char_before(close)?;
    let after_close = cur.char_at(close + 1);
    if before_close.is_whitespace() || after_close.is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((
        Piece::Raw {
            text: start + 1..close,
            equation: true,
        },
        close + 1,
    ))
}

fn try_underline(cur: &Cursor<'_>, style: &Style, misses: &mut Misses) -> Option<(Piece, usize)> {
    if !cur.starts_with(Underline::OPEN) {
        return None;
    }
    let from = cur.i + Underline::OPEN.len();
    let close = find_bytes(cur, from, Closer::Bytes(Underline::CLOSE), misses)?;
    let style = Style {
        underline: true,
        ..style.clone()
    };
    Some((
        Piece::Styled {
            inner: from..close,
            style,
        },
        close + Underline::CLOSE.len(),
    ))
}

fn try_emphasis(cur: &Cursor<'_>, style: &Style, misses: &mut Misses) -> Option<(Piece, usize)> {
    let byte = cur.peek()?;
    let start = cur.i;

    // Intraword underscores (snake_case) never open emphasis.
    if byte == Emphasis::UNDERSCORE && cur.char_before(start).is_some_and(char::is_alphanumeric) {
        return None;
    }

    let run = cur.run_len(start, byte);
    let width = if run >= 2 { 2 } else { 1 };
    let from = start + width;
    if cur.char_at(from).is_none_or(char::is_whitespace) || from >= cur.end {
        return None;
    }

    let close = find_emphasis_closer(cur, from, start + run, byte, width, misses)?;
    let style = if width == 2 {
        Style {
            bold: true,
            ..style.clone()
        }
    } else {
        Style {
            italic: true,
            ..style.clone()
        }
    };
    Some((
        Piece::Styled {
            inner: from..close,
            style,
        },
        close + width,
    ))
}

fn try_strikethrough(
    cur: &Cursor<'_>,
    style: &Style,
    misses: &mut Misses,
) -> Option<(Piece, usize)> {
    let run = cur.run_len(cur.i, Strikethrough::TILDE);
    if run < 2 {
        return None;
    }
    let from = cur.i + 2;
    if cur.char_at(from).is_none_or(char::is_whitespace) || from >= cur.end {
        return None;
    }
    let close = find_emphasis_closer(cur, from, cur.i + run, Strikethrough::TILDE, 2, misses)?;
    let style = Style {
        strikethrough: true,
        ..style.clone()
    };
    Some((
        Piece::Styled {
            inner: from..close,
            style,
        },
        close + 2,
    ))
}

fn try_link(cur: &Cursor<'_>, style: &Style, misses: &mut Misses) -> Option<(Piece, usize)> {
    let label_start = cur.i + 1;
    let label_end = find_bytes(cur, label_start, Closer::Bytes(b"]"), misses)?;
    if cur.byte_at(label_end + 1) != Some(Link::URL_OPEN) {
        return None;
    }
    let url_start = label_end + 2;
    let url_end = find_bytes(cur, url_start, Closer::Bytes(b")"), misses)?;
    let url = cur.s[url_start..url_end].trim();
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return None;
    }

    let style = Style {
        link: Some(url.to_string()),
        ..style.clone()
    };
    let end = url_end + 1;
    if label_start == label_end {
        // `[](url)`: show the address itself.
        let url_range = trim_range(cur.s, url_start..url_end);
        return Some((
            Piece::Styled {
                inner: url_range,
                style: Style {
                    link: style.link,
                    ..Style::default()
                },
            },
            end,
        ));
    }
    Some((
        Piece::Styled {
            inner: label_start..label_end,
            style,
        },
        end,
    ))
}

fn find_bytes(cur: &Cursor<'_>, from: usize, closer: Closer, misses: &mut Misses) -> Option<usize> {
    let Closer::Bytes(pat) = closer else {
        return None;
    };
    if misses.known_miss(closer, from, cur.end) {
        return None;
    }
    let found = cur.find_from(from, pat);
    if found.is_none() {
        misses.record(closer, from, cur.end);
    }
    found
}

/// Finds a run of exactly `width` copies of `byte` (code span closers).
fn find_exact_run(
    cur: &Cursor<'_>,
    from: usize,
    byte: u8,
    width: usize,
    misses: &mut Misses,
) -> Option<usize> {
    let closer = Closer::Run { byte, width };
    if misses.known_miss(closer, from, cur.end) {
        return None;
    }
    let mut idx = from;
    while let Some(at) = cur.find_from(idx, &[byte]) {
        let len = cur.run_len(at, byte);
        if len == width {
            return Some(at);
        }
        idx = at + len;
    }
    misses.record(closer, from, cur.end);
    None
}

/// Finds the start of a closing emphasis delimiter of `width` bytes.
///
/// The closer is taken from the tail of a delimiter run that starts at or
/// after `min_run` (the end of the opener's own run), so `***x***` closes
/// the strong pair around `*x*`. Single-width closers skip runs of exactly
/// two, which belong to a nested strong pair.
fn find_emphasis_closer(
    cur: &Cursor<'_>,
    from: usize,
    min_run: usize,
    byte: u8,
    width: usize,
    misses: &mut Misses,
) -> Option<usize> {
    let closer = Closer::Run { byte, width };
    if misses.known_miss(closer, from, cur.end) {
        return None;
    }

    let mut idx = from;
    while let Some(at) = cur.find_from(idx, &[byte]) {
        let len = cur.run_len(at, byte);
        let accepts = if width == 1 {
            len == 1 || len >= 3
        } else {
            len >= width
        };
        let close = at + len - width;
        if accepts && at >= min_run && closer_flanks(cur, close, byte, width) {
            return Some(close);
        }
        idx = at + len;
    }

    misses.record(closer, from, cur.end);
    None
}

fn closer_flanks(cur: &Cursor<'_>, close: usize, byte: u8, width: usize) -> bool {
    if cur.char_before(close).is_none_or(char::is_whitespace) {
        return false;
    }
    if byte == Emphasis::UNDERSCORE
        && cur
            .char_at(close + width)
            .is_some_and(char::is_alphanumeric)
    {
        return false;
    }
    true
}

fn trim_range(s: &str, r: Range<usize>) -> Range<usize> {
    let slice = &s[r.clone()];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead + trail >= slice.len() {
        return r.start..r.start;
    }
    r.start + lead..r.end - trail
}

//! # Lexer
//!
//! A single linear pass over the input lines producing one [`Token`] per
//! block construct. Each line is classified from local facts only; the
//! lexer records indentation and quote depth but never resolves nesting.
//!
//! Multi-line constructs with explicit delimiters (code fences, `$$`
//! blocks, `\begin{env}` blocks, `<aside>` callouts) are consumed whole so
//! their bodies are never re-interpreted. An unterminated code fence is
//! still emitted and runs to the end of input; unterminated equation and
//! aside openers degrade to paragraph lines. Closer lines are indexed once
//! up front so an opener never rescans the rest of the input.

pub mod kinds;
mod stream;
mod token;

pub use stream::TokenStream;
pub use token::{CalloutSource, Token, TokenKind};

use std::collections::HashMap;

use crate::ast::TableFormat;

use kinds::{
    Admonition, Aside, BlockQuote, CodeFence, Divider, Equation, Heading, ListMarker, MediaLine,
    TableRow, ToggleMarker,
};

/// Columns a tab advances indentation by.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Treat every non-blank line as a row in this dialect.
    pub delimited: Option<TableFormat>,
}

/// Tokenizes markup text.
pub fn tokenize(text: &str) -> TokenStream {
    tokenize_with(text, &LexOptions::default())
}

pub fn tokenize_with(text: &str, options: &LexOptions) -> TokenStream {
    let lines: Vec<&str> = text.lines().collect();
    let tokens = match options.delimited {
        Some(format) => lex_delimited(&lines, format),
        None => Lexer::new(&lines).run(),
    };
    log::trace!("lexed {} lines into {} tokens", lines.len(), tokens.len());
    TokenStream::new(tokens)
}

/// Leading whitespace as (columns, bytes).
pub fn indent_of(line: &str) -> (usize, usize) {
    let mut cols = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => cols += 1,
            b'\t' => cols += TAB_WIDTH,
            _ => break,
        }
        bytes += 1;
    }
    (cols, bytes)
}

/// Removes up to `cols` columns of leading whitespace.
fn dedent(line: &str, cols: usize) -> &str {
    let mut seen = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        if seen >= cols {
            break;
        }
        match b {
            b' ' => seen += 1,
            b'\t' => seen += TAB_WIDTH,
            _ => break,
        }
        bytes += 1;
    }
    &line[bytes..]
}

fn lex_delimited(lines: &[&str], format: TableFormat) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let start = i;
        if lines[i].trim().is_empty() {
            tokens.push(blank(i));
            i += 1;
            continue;
        }
        let mut record = lines[i].to_string();
        i += 1;
        let cells = loop {
            if let Some(cells) = TableRow::split(format, &record) {
                break cells;
            }
            // CSV quoted field spanning lines
            match lines.get(i) {
                Some(next) => {
                    record.push('\n');
                    record.push_str(next);
                    i += 1;
                }
                None => {
                    record.push('"');
                    break TableRow::split(format, &record).unwrap_or_else(|| vec![record.clone()]);
                }
            }
        };
        let raw = lines[start..i].join("\n");
        tokens.push(Token {
            kind: TokenKind::TableRow {
                format,
                cells,
                separator: false,
            },
            content: raw.trim().to_string(),
            raw,
            indent: 0,
            lines: start..i,
        });
    }
    tokens
}

fn blank(line: usize) -> Token {
    Token {
        kind: TokenKind::Blank,
        raw: String::new(),
        content: String::new(),
        indent: 0,
        lines: line..line + 1,
    }
}

/// Ascending line indexes of every closing delimiter.
#[derive(Default)]
struct Closers<'a> {
    aside: Vec<usize>,
    display: Vec<usize>,
    envs: HashMap<&'a str, Vec<usize>>,
}

impl<'a> Closers<'a> {
    fn index(lines: &[&'a str]) -> Self {
        let mut closers = Self::default();
        for (j, &line) in lines.iter().enumerate() {
            if Aside::close_at(line).is_some() {
                closers.aside.push(j);
            }
            if Equation::closes_display(line).is_some() {
                closers.display.push(j);
            }
            for env in Equation::end_envs(line) {
                let at = closers.envs.entry(env).or_default();
                if at.last() != Some(&j) {
                    at.push(j);
                }
            }
        }
        closers
    }

    /// First entry of `at` that is `>= from`.
    fn next(at: &[usize], from: usize) -> Option<usize> {
        at.get(at.partition_point(|&j| j < from)).copied()
    }

    fn aside(&self, from: usize) -> Option<usize> {
        Self::next(&self.aside, from)
    }

    fn display(&self, from: usize) -> Option<usize> {
        Self::next(&self.display, from)
    }

    fn env(&self, env: &str, from: usize) -> Option<usize> {
        Self::next(self.envs.get(env)?, from)
    }
}

struct Lexer<'a> {
    lines: &'a [&'a str],
    closers: Closers<'a>,
    i: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            closers: Closers::index(lines),
            i: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.i < self.lines.len() {
            self.line();
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, content: impl Into<String>, indent: usize, end: usize) {
        let start = self.i;
        self.tokens.push(Token {
            kind,
            raw: self.lines[start..end].join("\n"),
            content: content.into(),
            indent,
            lines: start..end,
        });
        self.i = end;
    }

    fn line(&mut self) {
        let line = self.lines[self.i];
        if line.trim().is_empty() {
            self.tokens.push(blank(self.i));
            self.i += 1;
            return;
        }

        let (indent, offset) = indent_of(line);
        let rest = line[offset..].trim_end();
        let single = self.i + 1;

        if let Some(sig) = CodeFence::sig(rest) {
            self.code_block(rest, sig, indent);
            return;
        }
        if Aside::opens(rest) && self.aside(indent) {
            return;
        }
        if self.display_equation(rest, indent) {
            return;
        }
        if let Some((level, text)) = Heading::parse(rest) {
            self.push(TokenKind::Heading { level }, text, indent, single);
            return;
        }
        if Divider::matches(rest) {
            self.push(TokenKind::Divider, "", indent, single);
            return;
        }

        if let Some((depth, inner)) = BlockQuote::strip(rest) {
            let inner = inner.trim_end();
            if depth == 1
                && let Some((callout_type, title)) = Admonition::parse(inner)
            {
                let kind = TokenKind::Callout {
                    callout_type,
                    source: CalloutSource::Markup,
                    icon: None,
                };
                self.push(kind, title, indent, single);
                return;
            }
            self.push(TokenKind::Quote { depth }, inner, indent, single);
            return;
        }

        if let Some(summary) = ToggleMarker::parse(rest) {
            self.push(TokenKind::Toggle, summary, indent, single);
            return;
        }
        if let Some(cells) = TableRow::split_pipe(rest) {
            let separator = TableRow::is_separator(&cells);
            let kind = TokenKind::TableRow {
                format: TableFormat::Markdown,
                cells,
                separator,
            };
            self.push(kind, rest, indent, single);
            return;
        }
        if let Some(marker) = ListMarker::parse(rest) {
            let kind = TokenKind::ListItem {
                list_type: marker.list_type,
                checked: marker.checked,
                number: marker.number,
            };
            self.push(kind, &rest[marker.content_offset..], indent, single);
            return;
        }
        if let Some(cells) = TableRow::split_tsv(rest) {
            let kind = TokenKind::TableRow {
                format: TableFormat::Tsv,
                cells,
                separator: false,
            };
            self.push(kind, rest, indent, single);
            return;
        }
        match MediaLine::parse(rest) {
            Some(MediaLine::Image { alt, url }) => {
                self.push(TokenKind::Image { alt: alt.clone(), url }, alt, indent, single);
                return;
            }
            Some(MediaLine::Link { title, url }) => {
                let content = title.clone().unwrap_or_else(|| url.clone());
                self.push(TokenKind::LinkLine { title, url }, content, indent, single);
                return;
            }
            None => {}
        }
        if let Some(body) = Equation::single_line_inline(rest) {
            self.push(TokenKind::Equation { display: false }, body, indent, single);
            return;
        }
        self.push(TokenKind::Paragraph, rest, indent, single);
    }

    fn code_block(&mut self, rest: &str, sig: kinds::FenceSig, indent: usize) {
        let language = CodeFence::info(rest, sig);
        let mut body = Vec::new();
        let mut j = self.i + 1;
        let mut closed = false;
        while j < self.lines.len() {
            let line = self.lines[j];
            j += 1;
            if CodeFence::closes(sig, line) {
                closed = true;
                break;
            }
            body.push(dedent(line, indent));
        }
        self.push(
            TokenKind::CodeBlock { language, closed },
            body.join("\n"),
            indent,
            j,
        );
    }

    /// `<aside>` through `</aside>`; false when no closing tag follows.
    fn aside(&mut self, indent: usize) -> bool {
        let Some(end) = self.closers.aside(self.i) else {
            return false;
        };
        let joined = self.lines[self.i..=end].join("\n");
        let inner = joined
            .find('>')
            .map(|gt| &joined[gt + 1..])
            .unwrap_or_default();
        let inner = match Aside::close_at(inner) {
            Some(at) => &inner[..at],
            None => inner,
        };
        let body = inner
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let (icon, text) = Aside::leading_icon(&body);
        let callout_type = icon
            .as_deref()
            .and_then(Admonition::type_for_icon)
            .unwrap_or(Admonition::DEFAULT_TYPE)
            .to_string();
        let kind = TokenKind::Callout {
            callout_type,
            source: CalloutSource::Html,
            icon,
        };
        let text = text.to_string();
        self.push(kind, text, indent, end + 1);
        true
    }

    fn display_equation(&mut self, rest: &str, indent: usize) -> bool {
        if let Some(body) = Equation::single_line_display(rest) {
            self.push(TokenKind::Equation { display: true }, body, indent, self.i + 1);
            return true;
        }
        if let Some(first) = Equation::opens_display(rest) {
            let Some(close) = self.closers.display(self.i + 1) else {
                return false;
            };
            let mut body: Vec<&str> = Vec::new();
            if !first.is_empty() {
                body.push(first);
            }
            body.extend(self.lines[self.i + 1..close].iter().map(|l| dedent(l, indent)));
            if let Some(last) = Equation::closes_display(self.lines[close])
                && !last.is_empty()
            {
                body.push(last);
            }
            let body = body.join("\n");
            self.push(TokenKind::Equation { display: true }, body.trim(), indent, close + 1);
            return true;
        }
        if let Some(env) = Equation::begin_env(rest) {
            let Some(close) = self.closers.env(env, self.i) else {
                return false;
            };
            let body = self.lines[self.i..=close]
                .iter()
                .map(|l| dedent(l, indent))
                .collect::<Vec<_>>()
                .join("\n");
            self.push(TokenKind::Equation { display: true }, body, indent, close + 1);
            return true;
        }
        false
    }
}

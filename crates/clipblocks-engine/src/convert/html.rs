//! Lightweight HTML to markup conversion.
//!
//! Only the structure the block parsers understand is kept; every other
//! tag is dropped with its text preserved. `<script>`, `<style>`, `<head>`
//! and comments are removed with their content. `<aside>` survives as-is
//! so the lexer can turn it into a callout.

use std::sync::OnceLock;

use regex::Regex;

static TAG_RE: OnceLock<Regex> = OnceLock::new();
static ATTR_RE: OnceLock<Regex> = OnceLock::new();
static HIDDEN_RE: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:[^>\x22']|\x22[^\x22]*\x22|'[^']*')*)>")
            .expect("Invalid HTML tag regex")
    })
}

fn attr_regex() -> &'static Regex {
    ATTR_RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(href|src|alt)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
            .expect("Invalid HTML attribute regex")
    })
}

fn hidden_regex() -> &'static Regex {
    HIDDEN_RE.get_or_init(|| {
        Regex::new(
            r"(?is)<!--.*?-->|<script\b.*?</script>|<style\b.*?</style>|<head\b.*?</head>|<!doctype[^>]*>",
        )
        .expect("Invalid HTML hidden-content regex")
    })
}

fn blank_run_regex() -> &'static Regex {
    BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("Invalid blank line regex"))
}

/// Wrapper whose content is collected separately and rewritten on close.
enum Frame {
    Quote,
    Aside,
    Link(Option<String>),
}

#[derive(Default)]
struct Writer {
    /// Output buffers; the first is the document, the rest open frames.
    buffers: Vec<String>,
    frames: Vec<Frame>,
    /// Open lists: ordered flag and next ordinal.
    lists: Vec<(bool, u32)>,
    pre: usize,
}

impl Writer {
    fn out(&mut self) -> &mut String {
        if self.buffers.is_empty() {
            self.buffers.push(String::new());
        }
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }

    fn at_line_start(&mut self) -> bool {
        let out = self.out();
        out.is_empty() || out.ends_with('\n')
    }

    fn text(&mut self, raw: &str) {
        let decoded = html_escape::decode_html_entities(raw);
        if self.pre > 0 {
            self.out().push_str(&decoded);
            return;
        }
        let mut collapsed = String::with_capacity(decoded.len());
        let mut space = false;
        for c in decoded.chars() {
            if c.is_whitespace() {
                space = true;
                continue;
            }
            if space {
                collapsed.push(' ');
            }
            space = false;
            collapsed.push(c);
        }
        if space {
            collapsed.push(' ');
        }
        if self.at_line_start() || self.out().ends_with(' ') {
            collapsed = collapsed.trim_start().to_string();
        }
        self.out().push_str(&collapsed);
    }

    fn block_break(&mut self) {
        if self.lists.is_empty() {
            self.out().push_str("\n\n");
        } else if !self.at_line_start() {
            self.out().push('\n');
        }
    }

    fn open_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.out();
        self.buffers.push(String::new());
    }

    fn close_frame(&mut self, matches: impl Fn(&Frame) -> bool) {
        if !self.frames.last().is_some_and(&matches) {
            return;
        }
        let (Some(frame), Some(body)) = (self.frames.pop(), self.buffers.pop()) else {
            return;
        };
        let rendered = match frame {
            Frame::Quote => {
                let body = collapse_blank_runs(&body);
                let lines: Vec<String> = body
                    .trim()
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(|l| format!(">> {}", l.trim()))
                    .collect();
                format!("\n\n{}\n\n", lines.join("\n"))
            }
            Frame::Aside => format!("\n\n<aside>\n{}\n</aside>\n\n", collapse_blank_runs(&body).trim()),
            Frame::Link(Some(href)) if !body.trim().is_empty() => format!("[{}]({href})", body.trim()),
            Frame::Link(_) => body,
        };
        self.out().push_str(&rendered);
    }

    fn tag(&mut self, closing: bool, name: &str, attrs: &str) {
        let attr = |key: &str| attribute(attrs, key);
        match (closing, name) {
            (false, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.out().push_str("\n\n");
                let marker = "#".repeat(level);
                self.out().push_str(&marker);
                self.out().push(' ');
            }
            (true, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => self.out().push_str("\n\n"),
            (_, "p" | "div" | "section" | "article" | "header" | "footer" | "main" | "table" | "tr") => {
                self.block_break()
            }
            (false, "br") => self.out().push('\n'),
            (false, "hr") => self.out().push_str("\n\n---\n\n"),
            (false, "ul" | "ol") => {
                if !self.at_line_start() {
                    self.out().push('\n');
                }
                self.lists.push((name == "ol", 1));
            }
            (true, "ul" | "ol") => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.out().push_str("\n\n");
                }
            }
            (false, "li") => {
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some((true, n)) => {
                        let m = format!("{n}. ");
                        *n += 1;
                        m
                    }
                    _ => "- ".to_string(),
                };
                if !self.at_line_start() {
                    self.out().push('\n');
                }
                let line = format!("{}{marker}", "  ".repeat(depth));
                self.out().push_str(&line);
            }
            (true, "li") => {
                if !self.at_line_start() {
                    self.out().push('\n');
                }
            }
            (_, "strong" | "b") => self.out().push_str("**"),
            (_, "em" | "i") => self.out().push('*'),
            (_, "s" | "del" | "strike") => self.out().push_str("~~"),
            (false, "u") => self.out().push_str("<u>"),
            (true, "u") => self.out().push_str("</u>"),
            (_, "code") if self.pre == 0 => self.out().push('`'),
            (false, "pre") => {
                self.out().push_str("\n\n```\n");
                self.pre += 1;
            }
            (true, "pre") => {
                self.pre = self.pre.saturating_sub(1);
                if !self.at_line_start() {
                    self.out().push('\n');
                }
                self.out().push_str("```\n\n");
            }
            (false, "a") => self.open_frame(Frame::Link(attr("href"))),
            (true, "a") => self.close_frame(|f| matches!(f, Frame::Link(_))),
            (false, "img") => {
                if let Some(src) = attr("src") {
                    let alt = attr("alt").unwrap_or_default();
                    let line = format!("\n\n![{alt}]({src})\n\n");
                    self.out().push_str(&line);
                }
            }
            (false, "blockquote") => self.open_frame(Frame::Quote),
            (true, "blockquote") => self.close_frame(|f| matches!(f, Frame::Quote)),
            (false, "aside") => self.open_frame(Frame::Aside),
            (true, "aside") => self.close_frame(|f| matches!(f, Frame::Aside)),
            (_, "td" | "th") => {
                if !self.at_line_start() {
                    self.out().push(' ');
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        // Unclosed frames are folded into their parent.
        while !self.frames.is_empty() {
            self.close_frame(|_| true);
        }
        let doc = self.buffers.concat();
        collapse_blank_runs(&doc).trim().to_string()
    }
}

fn attribute(attrs: &str, key: &str) -> Option<String> {
    attr_regex()
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(key))
        .and_then(|c| c.get(2).or_else(|| c.get(3)).or_else(|| c.get(4)))
        .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
        .filter(|v| !v.is_empty())
}

fn collapse_blank_runs(text: &str) -> String {
    blank_run_regex().replace_all(text, "\n\n").into_owned()
}

/// Converts an HTML fragment into markup the block parsers read.
pub fn to_markup(html: &str) -> String {
    let visible = hidden_regex().replace_all(html, "");
    let mut writer = Writer::default();
    let mut last = 0;
    for caps in tag_regex().captures_iter(&visible) {
        let Some(whole) = caps.get(0) else { continue };
        writer.text(&visible[last..whole.start()]);
        let name = caps[2].to_ascii_lowercase();
        writer.tag(&caps[1] == "/", &name, &caps[3]);
        last = whole.end();
    }
    writer.text(&visible[last..]);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headings_and_paragraphs() {
        assert_eq!(
            to_markup("<h2>Title</h2><p>Some <b>bold</b> and <em>soft</em> text.</p>"),
            "## Title\n\nSome **bold** and *soft* text."
        );
    }

    #[test]
    fn lists_keep_nesting_and_ordinals() {
        let html = "<ol><li>one</li><li>two<ul><li>inner</li></ul></li></ol>";
        assert_eq!(to_markup(html), "1. one\n2. two\n  - inner");
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            to_markup(r#"<p>See <a href="https://example.com">the site</a></p><img src="https://example.com/a.png" alt="A">"#),
            "See [the site](https://example.com)\n\n![A](https://example.com/a.png)"
        );
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(to_markup("<p>Fish &amp; chips &lt;3</p>"), "Fish & chips <3");
    }

    #[test]
    fn pre_keeps_whitespace() {
        assert_eq!(
            to_markup("<pre><code>fn main() {\n    run();\n}</code></pre>"),
            "```\nfn main() {\n    run();\n}\n```"
        );
    }

    #[test]
    fn blockquote_and_aside() {
        assert_eq!(to_markup("<blockquote><p>Wise words</p></blockquote>"), ">> Wise words");
        assert_eq!(
            to_markup("<aside>💡 Use the cache</aside>"),
            "<aside>\n💡 Use the cache\n</aside>"
        );
    }

    #[test]
    fn scripts_and_unknown_tags_are_dropped() {
        assert_eq!(
            to_markup("<div><script>alert(1)</script><span class=\"x\">kept</span><!-- gone --></div>"),
            "kept"
        );
    }

    #[test]
    fn line_breaks() {
        assert_eq!(to_markup("a<br>b<hr>c"), "a\nb\n\n---\n\nc");
    }
}

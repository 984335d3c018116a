//! # Pretty Printer
//!
//! Renders nodes back to markup. The output dialect is the one the lexer
//! reads, so printing and re-parsing keeps node types: quotes print as
//! `>> `, toggles and toggleable list items as `> `, callouts as
//! `> [!type]`.

use serde::{Deserialize, Serialize};

use crate::{
    ast::{AstNode, ListItemMeta, ListType, MediaMeta, NodeKind, TableFormat, TableMeta},
    error::OptionsError,
    parsing::inline::to_markup,
};

/// Largest accepted space indent.
pub const MAX_INDENT_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Spaces per nesting level when `use_tabs` is off.
    pub indent_size: usize,
    pub use_tabs: bool,
    /// Separate top-level nodes with an empty line.
    pub add_blank_lines: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            use_tabs: false,
            add_blank_lines: true,
        }
    }
}

impl PrintOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.use_tabs && !(1..=MAX_INDENT_SIZE).contains(&self.indent_size) {
            return Err(OptionsError::IndentSize {
                got: self.indent_size,
                max: MAX_INDENT_SIZE,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Printer {
    options: PrintOptions,
    unit: String,
}

impl Printer {
    pub fn new(options: PrintOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        let unit = if options.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(options.indent_size)
        };
        Ok(Self { options, unit })
    }

    pub fn print(&self, nodes: &[AstNode]) -> String {
        let separator = if self.options.add_blank_lines { "\n\n" } else { "\n" };
        nodes
            .iter()
            .map(|n| self.node(n))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn node(&self, node: &AstNode) -> String {
        let own = self.own_text(node);
        if node.children.is_empty() {
            return own;
        }
        let mut out = own;
        for (i, child) in node.children.iter().enumerate() {
            out.push('\n');
            // Without a blank line the paragraph would continue the item's text.
            if i == 0 && continues_lines(node) && child.kind == NodeKind::Paragraph {
                out.push('\n');
            }
            out.push_str(&indent_lines(&self.node(child), &self.unit));
        }
        out
    }

    /// `lead` before the first line, continuation lines indented one level.
    fn hanging(&self, lead: &str, text: &str) -> String {
        let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
        let mut out = format!("{lead}{first}");
        if !rest.is_empty() {
            out.push('\n');
            out.push_str(&indent_lines(rest, &self.unit));
        }
        out
    }

    fn own_text(&self, node: &AstNode) -> String {
        let text = || to_markup(&node.spans());
        match &node.kind {
            NodeKind::Paragraph => text(),
            NodeKind::Heading { level } => format!("{} {}", "#".repeat(*level as usize), text()),
            NodeKind::ListItem(meta) => self.hanging(&list_marker(meta), &text()),
            NodeKind::Code { language, is_block } => {
                if *is_block {
                    code_block(language.as_deref(), &node.content)
                } else {
                    inline_code(&node.content)
                }
            }
            NodeKind::Table(meta) => table(meta),
            NodeKind::Callout(meta) => prefix_lines(&format!("[!{}] {}", meta.callout_type, text()), "> "),
            NodeKind::Quote => prefix_lines(&text(), ">> "),
            NodeKind::Toggle { heading_level } => {
                let lead = match heading_level {
                    Some(level) => format!("> {} ", "#".repeat(*level as usize)),
                    None => "> ".to_string(),
                };
                self.hanging(&lead, &text())
            }
            NodeKind::Divider => "---".to_string(),
            NodeKind::Media(meta) => media(meta),
            NodeKind::Equation { is_block } => {
                if *is_block {
                    format!("$$\n{}\n$$", node.content)
                } else {
                    format!("${}$", node.content)
                }
            }
            NodeKind::Bookmark { url, title } => link_or_url(title.as_deref(), url),
        }
    }
}

/// Prints with the given options.
pub fn print(nodes: &[AstNode], options: &PrintOptions) -> Result<String, OptionsError> {
    Ok(Printer::new(*options)?.print(nodes))
}

/// Marker and trailing space, e.g. `- [x] ` or `> 3. `.
fn list_marker(meta: &ListItemMeta) -> String {
    let marker = match meta.list_type {
        ListType::Bulleted => "-".to_string(),
        ListType::Numbered => format!("{}.", meta.number.unwrap_or(1)),
        ListType::Todo if meta.checked == Some(true) => "- [x]".to_string(),
        ListType::Todo => "- [ ]".to_string(),
    };
    let toggle = if meta.is_toggleable { "> " } else { "" };
    format!("{toggle}{marker} ")
}

/// Plain list items read indented lines right below them as more text.
fn continues_lines(node: &AstNode) -> bool {
    matches!(&node.kind, NodeKind::ListItem(meta) if !meta.is_toggleable)
}

fn code_block(language: Option<&str>, content: &str) -> String {
    let longest = longest_run(content, '`');
    let fence = "`".repeat(longest.max(2) + 1);
    format!("{fence}{}\n{content}\n{fence}", language.unwrap_or_default())
}

fn inline_code(content: &str) -> String {
    if content.contains('`') {
        format!("`` {content} ``")
    } else {
        format!("`{content}`")
    }
}

fn longest_run(s: &str, c: char) -> usize {
    let mut best = 0;
    let mut run = 0;
    for ch in s.chars() {
        if ch == c {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

fn table(meta: &TableMeta) -> String {
    match meta.table_type {
        TableFormat::Markdown => {
            let row = |cells: &[String]| {
                let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
                format!("| {} |", escaped.join(" | "))
            };
            let mut lines = vec![row(&meta.headers)];
            lines.push(format!("|{}|", vec![" --- "; meta.width()].join("|")));
            lines.extend(meta.rows.iter().map(|r| row(r)));
            lines.join("\n")
        }
        TableFormat::Csv => std::iter::once(&meta.headers)
            .chain(&meta.rows)
            .map(|r| r.iter().map(|c| csv_cell(c)).collect::<Vec<_>>().join(","))
            .collect::<Vec<_>>()
            .join("\n"),
        TableFormat::Tsv => std::iter::once(&meta.headers)
            .chain(&meta.rows)
            .map(|r| r.join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn media(meta: &MediaMeta) -> String {
    match meta.kind {
        crate::ast::MediaKind::Image => {
            format!("![{}]({})", meta.caption.as_deref().unwrap_or_default(), meta.url)
        }
        _ => link_or_url(meta.caption.as_deref(), &meta.url),
    }
}

fn link_or_url(title: Option<&str>, url: &str) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("[{title}]({url})"),
        _ => url.to_string(),
    }
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| format!("{prefix}{line}").trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_lines(text: &str, unit: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{unit}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CalloutMeta, MediaKind};
    use crate::parsing::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(nodes: &[AstNode]) -> String {
        print(nodes, &PrintOptions::default()).unwrap()
    }

    #[test]
    fn literal_fixtures() {
        assert_eq!(render(&[AstNode::heading(1, "Title")]), "# Title");
        let task = AstNode::new(NodeKind::ListItem(ListItemMeta::todo(true)), "Task");
        assert_eq!(render(&[task]), "- [x] Task");
        assert_eq!(render(&[AstNode::divider()]), "---");
    }

    #[rstest]
    #[case(NodeKind::ListItem(ListItemMeta::bulleted()), "- x")]
    #[case(NodeKind::ListItem(ListItemMeta::numbered(4)), "4. x")]
    #[case(NodeKind::ListItem(ListItemMeta::todo(false)), "- [ ] x")]
    #[case(NodeKind::Heading { level: 3 }, "### x")]
    #[case(NodeKind::Quote, ">> x")]
    #[case(NodeKind::Toggle { heading_level: None }, "> x")]
    #[case(NodeKind::Toggle { heading_level: Some(2) }, "> ## x")]
    #[case(NodeKind::Code { language: None, is_block: false }, "`x`")]
    #[case(NodeKind::Code { language: Some("rust".into()), is_block: true }, "```rust\nx\n```")]
    #[case(NodeKind::Equation { is_block: true }, "$$\nx\n$$")]
    #[case(NodeKind::Equation { is_block: false }, "$x$")]
    fn per_type_rules(#[case] kind: NodeKind, #[case] expected: &str) {
        assert_eq!(render(&[AstNode::new(kind, "x")]), expected);
    }

    #[test]
    fn toggleable_list_item() {
        let mut meta = ListItemMeta::bulleted();
        meta.is_toggleable = true;
        assert_eq!(render(&[AstNode::new(NodeKind::ListItem(meta), "x")]), "> - x");
    }

    #[test]
    fn callout_prefixes_every_line() {
        let meta = CalloutMeta {
            callout_type: "warning".into(),
            icon: "⚠️".into(),
            color: "yellow".into(),
        };
        let node = AstNode::new(NodeKind::Callout(meta), "Be careful\nreally");
        assert_eq!(render(&[node]), "> [!warning] Be careful\n> really");
    }

    #[test]
    fn media_and_bookmarks() {
        let image = AstNode::new(
            NodeKind::Media(MediaMeta {
                kind: MediaKind::Image,
                url: "a.png".into(),
                caption: None,
            }),
            "",
        );
        let video = AstNode::new(
            NodeKind::Media(MediaMeta {
                kind: MediaKind::Video,
                url: "https://youtu.be/x".into(),
                caption: Some("Talk".into()),
            }),
            "",
        );
        let bookmark = AstNode::new(
            NodeKind::Bookmark {
                url: "https://example.com".into(),
                title: None,
            },
            "",
        );
        assert_eq!(
            render(&[image, video, bookmark]),
            "![](a.png)\n\n[Talk](https://youtu.be/x)\n\nhttps://example.com"
        );
    }

    #[test]
    fn tables_by_format() {
        let meta = |table_type| TableMeta {
            table_type,
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "x,y".into()]],
        };
        let table = |t| render(&[AstNode::new(NodeKind::Table(meta(t)), "")]);
        assert_eq!(table(TableFormat::Markdown), "| a | b |\n| --- | --- |\n| 1 | x,y |");
        assert_eq!(table(TableFormat::Csv), "a,b\n1,\"x,y\"");
        assert_eq!(table(TableFormat::Tsv), "a\tb\n1\tx,y");
    }

    #[test]
    fn children_indent_and_blank_lines() {
        let list = AstNode::new(NodeKind::ListItem(ListItemMeta::bulleted()), "a").with_children(vec![
            AstNode::new(NodeKind::ListItem(ListItemMeta::bulleted()), "b"),
        ]);
        let nodes = vec![list, AstNode::paragraph("after")];
        assert_eq!(render(&nodes), "- a\n  - b\n\nafter");

        let tight = PrintOptions {
            use_tabs: true,
            add_blank_lines: false,
            ..PrintOptions::default()
        };
        assert_eq!(print(&nodes, &tight).unwrap(), "- a\n\t- b\nafter");
    }

    #[test]
    fn toggle_children_are_not_quoted() {
        let toggle = AstNode::new(NodeKind::Toggle { heading_level: None }, "More")
            .with_children(vec![AstNode::paragraph("inside")]);
        assert_eq!(render(&[toggle]), "> More\n  inside");
    }

    #[test]
    fn multi_line_list_item_round_trips() {
        let item = AstNode::new(NodeKind::ListItem(ListItemMeta::bulleted()), "first\nsecond")
            .with_children(vec![AstNode::paragraph("body")]);
        let printed = render(&[item.clone()]);
        assert_eq!(printed, "- first\n  second\n\n  body");

        let reparsed = parse(&printed);
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0].content, item.content);
        assert_eq!(reparsed[0].children.len(), 1);
        assert_eq!(reparsed[0].children[0].content, "body");
    }

    #[test]
    fn multi_line_toggle_stays_one_toggle() {
        let toggle = AstNode::new(NodeKind::Toggle { heading_level: Some(2) }, "Title\nmore");
        let printed = render(&[toggle]);
        assert_eq!(printed, "> ## Title\n  more");

        let reparsed = parse(&printed);
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0].content, "Title");
        assert_eq!(reparsed[0].children[0].content, "more");
    }

    #[test]
    fn inline_formatting_is_reemitted() {
        let nodes = parse("Some **bold** and [a link](https://example.com)");
        assert_eq!(render(&nodes), "Some **bold** and [a link](https://example.com)");
    }

    #[test]
    fn code_containing_fences_gets_a_longer_fence() {
        let node = AstNode::new(
            NodeKind::Code {
                language: None,
                is_block: true,
            },
            "```\nx\n```",
        );
        assert_eq!(render(&[node]), "````\n```\nx\n```\n````");
    }

    #[test]
    fn bad_indent_is_rejected() {
        let options = PrintOptions {
            indent_size: 0,
            ..PrintOptions::default()
        };
        assert_eq!(
            Printer::new(options).unwrap_err(),
            OptionsError::IndentSize {
                got: 0,
                max: MAX_INDENT_SIZE
            }
        );
        let tabs = PrintOptions {
            indent_size: 0,
            use_tabs: true,
            ..PrintOptions::default()
        };
        assert!(Printer::new(tabs).is_ok());
    }

    #[test]
    fn printed_markup_parses_back_to_same_types() {
        let source = "# Title\n\n- a\n  - [x] b\n\n>> quoted words\n\n> [!tip] Hint\n\n> Fold\n  inside\n\n---\n\n```rust\nfn x() {}\n```\n\n$$\nx^2\n$$";
        let first = parse(source);
        let printed = render(&first);
        let second = parse(&printed);
        let types = |nodes: &[AstNode]| nodes.iter().map(|n| n.type_name()).collect::<Vec<_>>();
        assert_eq!(types(&first), types(&second));
        assert_eq!(printed, render(&second));
    }
}

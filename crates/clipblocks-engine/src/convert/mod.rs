//! # Conversion
//!
//! The whole pipeline behind one call: classify the text, pick a
//! conversion mode from the detected kind, build nodes, then format and
//! validate request-sized chunks.

pub mod html;

use serde::{Deserialize, Serialize};

use crate::{
    ast::{AstNode, MediaMeta, NodeKind, TableFormat},
    classify::{Classifier, ClassifierOptions, ContentClassification, ContentKind, unwrap_math, url},
    error::OptionsError,
    format::{FormatOptions, FormattedDocument, Formatter, ValidationResult, validate},
    parsing::{self, lexer::LexOptions},
    print::{PrintOptions, Printer},
};

/// Options for every pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub classifier: ClassifierOptions,
    pub printer: PrintOptions,
    pub formatter: FormatOptions,
}

/// Everything one conversion produced.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub classification: ContentClassification,
    pub nodes: Vec<AstNode>,
    /// The nodes printed back as markup.
    pub markup: String,
    pub document: FormattedDocument,
    /// One result per request chunk, in order.
    pub validations: Vec<ValidationResult>,
}

impl Conversion {
    /// True when every chunk can be written as-is.
    pub fn is_valid(&self) -> bool {
        self.validations.iter().all(|v| v.is_valid)
    }
}

/// Validated stages, reusable across calls.
#[derive(Debug, Clone)]
pub struct Converter {
    classifier: Classifier,
    printer: Printer,
    formatter: Formatter,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Result<Self, OptionsError> {
        Ok(Self {
            classifier: Classifier::new(options.classifier)?,
            printer: Printer::new(options.printer)?,
            formatter: Formatter::new(options.formatter)?,
        })
    }

    pub fn convert(&self, text: &str) -> Conversion {
        let classification = self.classifier.classify(text);
        let nodes = nodes_for(&classification, text);
        let markup = self.printer.print(&nodes);
        let document = self.formatter.format(&nodes);
        let limits = &self.formatter.options().limits;
        let validations: Vec<_> = document.chunk_slices().map(|chunk| validate(chunk, limits)).collect();
        log::debug!(
            "converted {} as {} into {} chunks",
            text.len(),
            classification.kind.name(),
            validations.len()
        );
        Conversion {
            classification,
            nodes,
            markup,
            document,
            validations,
        }
    }
}

/// Runs the pipeline with the given options.
pub fn convert(text: &str, options: &ConvertOptions) -> Result<Conversion, OptionsError> {
    Ok(Converter::new(*options)?.convert(text))
}

fn nodes_for(classification: &ContentClassification, text: &str) -> Vec<AstNode> {
    let trimmed = text.trim();
    match classification.kind {
        ContentKind::Url => vec![url_node(trimmed)],
        ContentKind::Json => vec![code_node(trimmed, Some("json".to_string()))],
        ContentKind::Code => vec![code_node(
            text.trim_matches(['\n', '\r']),
            classification.metadata.language.clone(),
        )],
        ContentKind::Latex => {
            let expression = unwrap_math(trimmed).map_or(trimmed, |(inner, _)| inner);
            vec![AstNode::new(NodeKind::Equation { is_block: true }, expression)]
        }
        ContentKind::Table(format @ (TableFormat::Csv | TableFormat::Tsv)) => parsing::parse_with(
            text,
            &LexOptions {
                delimited: Some(format),
            },
        ),
        ContentKind::Table(TableFormat::Markdown) | ContentKind::Markdown => parsing::parse(text),
        ContentKind::Html => parsing::parse(&html::to_markup(text)),
        ContentKind::Text => text_paragraphs(text),
    }
}

fn url_node(text: &str) -> AstNode {
    let href = if url::parse_web_url(text).is_some() {
        text.to_string()
    } else {
        format!("https://{text}")
    };
    match url::media_kind(&href) {
        Some(kind) => AstNode::new(
            NodeKind::Media(MediaMeta {
                kind,
                url: href,
                caption: None,
            }),
            "",
        ),
        None => AstNode::new(NodeKind::Bookmark { url: href, title: None }, ""),
    }
}

fn code_node(code: &str, language: Option<String>) -> AstNode {
    AstNode::new(
        NodeKind::Code {
            language,
            is_block: true,
        },
        code,
    )
}

/// One plain paragraph per blank-line separated chunk.
fn text_paragraphs(text: &str) -> Vec<AstNode> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(AstNode::paragraph(current.join("\n")));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(AstNode::paragraph(current.join("\n")));
    }
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{BlockType, Payload};
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> Conversion {
        convert(text, &ConvertOptions::default()).expect("default options are valid")
    }

    fn types(c: &Conversion) -> Vec<&'static str> {
        c.document.blocks.iter().map(|b| b.block_type.as_str()).collect()
    }

    #[test]
    fn url_becomes_bookmark_or_media() {
        let page = run("https://example.com/blog/post");
        assert_eq!(types(&page), vec!["bookmark"]);
        let video = run("https://www.youtube.com/watch?v=abc");
        assert_eq!(types(&video), vec!["video"]);
        let bare = run("www.example.com");
        assert_eq!(
            bare.document.blocks[0].payload,
            Payload::Bookmark {
                url: "https://www.example.com".into(),
                caption: vec![]
            }
        );
    }

    #[test]
    fn long_nested_list_fits_in_valid_requests() {
        let mut text = String::from("- parent\n");
        for i in 0..150 {
            text.push_str(&format!("  - child {i}\n"));
        }
        let c = run(&text);
        assert_eq!(c.classification.kind, ContentKind::Markdown);
        assert!(c.is_valid(), "{:?}", c.validations);
        assert_eq!(c.document.chunks.len(), 2);
        assert_eq!(c.document.total_blocks(), 151);
        assert!(c.document.remediations.iter().any(|v| matches!(
            v.limit,
            crate::format::Limit::BlockCount { actual: 151, .. }
        )));
    }

    #[test]
    fn json_becomes_one_code_block() {
        let c = run(r#"{"function":"test","code":true,"array":[1,2,3]}"#);
        assert_eq!(c.classification.kind, ContentKind::Json);
        assert_eq!(types(&c), vec!["code"]);
        assert_eq!(
            c.document.blocks[0].payload,
            Payload::Code {
                language: "json".into()
            }
        );
    }

    #[test]
    fn latex_becomes_block_equation() {
        let c = run("$$\\frac{a}{b}$$");
        assert_eq!(types(&c), vec!["equation"]);
        assert_eq!(
            c.document.blocks[0].payload,
            Payload::Equation {
                expression: "\\frac{a}{b}".into()
            }
        );
    }

    #[test]
    fn csv_becomes_one_table() {
        let c = run("name,age\nAda,36\nAlan,41");
        assert_eq!(types(&c), vec!["table"]);
        assert_eq!(c.document.blocks[0].children.len(), 3);
        assert!(c.is_valid());
    }

    #[test]
    fn markdown_runs_the_markup_pipeline() {
        let c = run("# Notes\n\n- **first** item\n- second item\n\n> [!tip] Try it");
        assert_eq!(c.classification.kind, ContentKind::Markdown);
        assert_eq!(types(&c), vec!["heading_1", "bulleted_list_item", "bulleted_list_item", "callout"]);
        assert!(c.markup.starts_with("# Notes"));
    }

    #[test]
    fn html_is_converted_first() {
        let c = run("<h1>Title</h1><p>Body with <strong>weight</strong></p><ul><li>a</li><li>b</li></ul>");
        assert_eq!(c.classification.kind, ContentKind::Html);
        assert_eq!(
            types(&c),
            vec!["heading_1", "paragraph", "bulleted_list_item", "bulleted_list_item"]
        );
        assert!(c.document.blocks[1].rich_text.iter().any(|s| s.bold));
    }

    #[test]
    fn text_is_not_interpreted() {
        let c = run("Meeting moved to 10 #team\nbring the notes\n\nAnd another one.");
        assert_eq!(c.classification.kind, ContentKind::Text);
        assert_eq!(c.nodes.len(), 2);
        assert_eq!(c.nodes[0].content, "Meeting moved to 10 #team\nbring the notes");
        assert_eq!(c.document.blocks[0].block_type, BlockType::Paragraph);
    }

    #[test]
    fn empty_input_produces_nothing() {
        let c = run("   ");
        assert!(c.nodes.is_empty());
        assert!(c.document.chunks.is_empty());
        assert!(c.is_valid());
    }

    #[test]
    fn long_documents_are_validated_per_chunk() {
        let text: Vec<String> = (0..230).map(|i| format!("- item {i}")).collect();
        let c = run(&text.join("\n"));
        assert_eq!(c.validations.len(), 3);
        assert!(c.is_valid());
    }

    #[test]
    fn invalid_stage_options_fail_fast() {
        let options = ConvertOptions {
            printer: PrintOptions {
                indent_size: 0,
                ..PrintOptions::default()
            },
            ..ConvertOptions::default()
        };
        assert!(matches!(
            convert("x", &options),
            Err(OptionsError::IndentSize { got: 0, .. })
        ));
    }
}

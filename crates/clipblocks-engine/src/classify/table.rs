use crate::{ast::TableFormat, parsing::lexer::kinds::TableRow};

use super::{
    MAX_SCAN_LINES,
    types::{ContentClassification, ContentKind, Metadata},
};

pub const MARKDOWN_CONFIDENCE: f64 = 0.95;
pub const TSV_CONFIDENCE: f64 = 0.9;
pub const CSV_CONFIDENCE: f64 = 0.85;

/// Tabular text: a pipe table, then TSV, then CSV.
pub fn detect(text: &str) -> Option<ContentClassification> {
    let lines: Vec<&str> = text
        .lines()
        .take(MAX_SCAN_LINES)
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }
    markdown(&lines)
        .or_else(|| delimited(&lines, TableFormat::Tsv))
        .or_else(|| delimited(&lines, TableFormat::Csv))
}

fn markdown(lines: &[&str]) -> Option<ContentClassification> {
    let header = TableRow::split_pipe(lines[0])?;
    let separator = TableRow::split_pipe(lines[1])?;
    if !TableRow::is_separator(&separator) {
        return None;
    }
    let rows = lines[2..]
        .iter()
        .take_while(|l| l.trim_start().starts_with(TableRow::PIPE))
        .count();
    // a pipe table followed by prose is a markdown document
    if 2 + rows < lines.len() {
        return None;
    }
    Some(table(TableFormat::Markdown, MARKDOWN_CONFIDENCE, rows + 1, header.len()))
}

/// Every line splits into the same number (≥2) of cells.
fn delimited(lines: &[&str], format: TableFormat) -> Option<ContentClassification> {
    let mut columns = None;
    for line in lines {
        let cells = match format {
            TableFormat::Tsv => TableRow::split_tsv(line)?,
            _ => TableRow::split_csv(line)?,
        };
        if cells.len() < 2 || looks_like_sentence(line) {
            return None;
        }
        match columns {
            None => columns = Some(cells.len()),
            Some(n) if n != cells.len() => return None,
            Some(_) => {}
        }
    }
    let confidence = match format {
        TableFormat::Tsv => TSV_CONFIDENCE,
        _ => CSV_CONFIDENCE,
    };
    Some(table(format, confidence, lines.len(), columns?))
}

/// Prose separated by commas: ends like a sentence and has many words.
fn looks_like_sentence(line: &str) -> bool {
    let t = line.trim_end();
    t.ends_with(['.', '!', '?']) && t.split_whitespace().count() > 6
}

fn table(format: TableFormat, confidence: f64, rows: usize, columns: usize) -> ContentClassification {
    let metadata = Metadata {
        delimiter: Some(format.delimiter()),
        rows: Some(rows),
        columns: Some(columns),
        ..Metadata::default()
    };
    ContentClassification::new(ContentKind::Table(format), confidence).with_metadata(metadata)
}

use crate::{
    ast::{AstNode, NodeKind, TableFormat, TableMeta},
    parsing::lexer::{Token, TokenKind, TokenStream},
};

fn row(tok: &Token) -> Option<(TableFormat, &[String], bool)> {
    match &tok.kind {
        TokenKind::TableRow {
            format,
            cells,
            separator,
        } => Some((*format, cells.as_slice(), *separator)),
        _ => None,
    }
}

/// Pipe tables need a separator under the header, TSV needs a second row,
/// CSV rows only exist in delimited mode and always form a table.
pub fn claims(stream: &TokenStream) -> bool {
    let Some((format, _, separator)) = stream.peek().and_then(row) else {
        return false;
    };
    if separator {
        return false;
    }
    let next = stream.peek_nth(1).and_then(row);
    match format {
        TableFormat::Csv => true,
        TableFormat::Markdown => {
            matches!(next, Some((TableFormat::Markdown, _, true)))
        }
        TableFormat::Tsv => matches!(next, Some((TableFormat::Tsv, _, false))),
    }
}

/// Normalizes every row, whatever the delimiter, to one shared width.
/// Short rows are padded; the header widens when a row is longer.
pub fn parse(stream: &mut TokenStream) -> Option<AstNode> {
    let first = stream.next()?;
    let (format, header, _) = row(&first)?;
    let mut headers = header.to_vec();
    let mut rows: Vec<Vec<String>> = Vec::new();

    while let Some((next_format, cells, separator)) = stream.peek().and_then(row) {
        if next_format != format {
            break;
        }
        if !separator {
            rows.push(cells.to_vec());
        }
        stream.next();
    }

    let width = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or_default();
    headers.resize(width, String::new());
    for r in &mut rows {
        r.resize(width, String::new());
    }

    let meta = TableMeta {
        table_type: format,
        headers,
        rows,
    };
    Some(AstNode::new(NodeKind::Table(meta), ""))
}

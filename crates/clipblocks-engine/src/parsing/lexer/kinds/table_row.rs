use crate::ast::TableFormat;

/// Cell splitting for the three table dialects.
pub struct TableRow;

impl TableRow {
    pub const PIPE: char = '|';

    /// Splits a pipe-table line. The line must start with `|`.
    ///
    /// Pipes inside backticks or escaped with `\` do not separate cells.
    pub fn split_pipe(line: &str) -> Option<Vec<String>> {
        let t = line.trim();
        let inner = t.strip_prefix(Self::PIPE)?;
        let inner = match inner.strip_suffix(Self::PIPE) {
            Some(s) if !s.ends_with('\\') => s,
            _ => inner,
        };

        let mut cells = Vec::new();
        let mut cell = String::new();
        let mut in_code = false;
        let mut escaped = false;
        for c in inner.chars() {
            if escaped {
                if c != Self::PIPE {
                    cell.push('\\');
                }
                cell.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '`' => {
                    in_code = !in_code;
                    cell.push(c);
                }
                '|' if !in_code => cells.push(std::mem::take(&mut cell).trim().to_string()),
                _ => cell.push(c),
            }
        }
        if escaped {
            cell.push('\\');
        }
        cells.push(cell.trim().to_string());
        Some(cells)
    }

    /// True for the `| --- | :---: |` row under a pipe-table header.
    pub fn is_separator(cells: &[String]) -> bool {
        !cells.is_empty()
            && cells.iter().all(|cell| {
                let c = cell.trim();
                let c = c.strip_prefix(':').unwrap_or(c);
                let c = c.strip_suffix(':').unwrap_or(c);
                !c.is_empty() && c.bytes().all(|b| b == b'-')
            })
    }

    /// Splits a tab-separated line. `None` unless it has at least two cells.
    pub fn split_tsv(line: &str) -> Option<Vec<String>> {
        if !line.contains('\t') {
            return None;
        }
        let cells: Vec<String> = line
            .trim_end_matches(['\r', '\n'])
            .split('\t')
            .map(|c| c.trim().to_string())
            .collect();
        (cells.len() >= 2).then_some(cells)
    }

    /// Splits one CSV record with `"` quoting and `""` escapes.
    ///
    /// Returns `None` while a quoted field is still open, so the caller can
    /// join the next physical line and retry.
    pub fn split_csv(record: &str) -> Option<Vec<String>> {
        let mut cells = Vec::new();
        let mut cell = String::new();
        let mut chars = record.chars().peekable();
        let mut quoted = false;
        let mut at_start = true;

        while let Some(c) = chars.next() {
            if quoted {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        quoted = false;
                    }
                } else {
                    cell.push(c);
                }
                continue;
            }
            match c {
                '"' if at_start => {
                    quoted = true;
                    at_start = false;
                }
                ',' => {
                    cells.push(std::mem::take(&mut cell).trim().to_string());
                    at_start = true;
                }
                ' ' if at_start => {}
                _ => {
                    cell.push(c);
                    at_start = false;
                }
            }
        }
        if quoted {
            return None;
        }
        cells.push(cell.trim_end_matches(['\r', '\n']).trim().to_string());
        Some(cells)
    }

    /// Splits a line in the given dialect.
    pub fn split(format: TableFormat, line: &str) -> Option<Vec<String>> {
        match format {
            TableFormat::Markdown => Self::split_pipe(line),
            TableFormat::Csv => Self::split_csv(line),
            TableFormat::Tsv => Some(
                line.trim_end_matches(['\r', '\n'])
                    .split('\t')
                    .map(|c| c.trim().to_string())
                    .collect(),
            ),
        }
    }
}

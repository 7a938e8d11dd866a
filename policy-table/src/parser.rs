use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::table::{normalize_header, Record, Table};
use crate::workbook::{parse_workbook, WORKBOOK_EXTENSIONS};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors that can occur while reading a table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input could not be tokenized as delimited text.
    #[error("failed to parse table: {0}")]
    Csv(#[from] csv::Error),
    /// Failed to read input file.
    #[error("failed to read table file: {0}")]
    Io(#[from] std::io::Error),
    /// Input has no header row.
    #[error("table has no header row")]
    MissingHeader,
    /// Two columns share the same normalized header name.
    #[error("duplicate column header '{0}'")]
    DuplicateHeader(String),
    /// Workbook container could not be opened or decoded.
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    /// Workbook holds no worksheet to read.
    #[error("workbook has no sheets")]
    EmptyWorkbook,
}

/// Options controlling how a table is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Field delimiter. `None` sniffs it from the header line.
    pub delimiter: Option<u8>,
}

/// Parse delimited bytes into a [`Table`].
pub fn parse(input: &[u8], options: &ParseOptions) -> Result<Table, ParseError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(input));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        rows.push((line, row.iter().map(str::to_string).collect()));
    }

    build_table(headers, rows)
}

/// Assemble a [`Table`] from a header row and `(line, cells)` data rows.
///
/// Shared by the delimited and workbook readers so both apply the same header checks
/// and blank-row skipping.
pub(crate) fn build_table(
    headers: Vec<String>,
    rows: Vec<(u64, Vec<String>)>,
) -> Result<Table, ParseError> {
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut seen = BTreeSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(normalize_header(header)) {
            return Err(ParseError::DuplicateHeader(header.clone()));
        }
    }

    let mut records = Vec::new();
    for (line, cells) in rows {
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let mut record = Record::new(line);
        for (header, value) in headers.iter().zip(cells) {
            if header.is_empty() {
                continue;
            }
            record.insert(header, value);
        }
        records.push(record);
    }

    Ok(Table { headers, records })
}

/// Parse a table file.
///
/// Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read from their first sheet. For
/// delimited text the delimiter follows the extension (`.tsv`, `.tab`) unless `options`
/// names one; other extensions are sniffed.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Table, ParseError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let mut effective = *options;
    match extension.as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => return parse_workbook(path),
        Some("tsv" | "tab") if effective.delimiter.is_none() => effective.delimiter = Some(b'\t'),
        _ => {}
    }

    let bytes = fs::read(path)?;
    parse(&bytes, &effective)
}

/// Pick the most frequent candidate delimiter on the first line, defaulting to comma.
fn sniff_delimiter(input: &[u8]) -> u8 {
    let first_line = input.split(|b| *b == b'\n').next().unwrap_or_default();
    let count = |needle: u8| first_line.iter().filter(|b| **b == needle).count();

    let mut best = (b',', count(b','));
    for candidate in [b';', b'\t'] {
        let n = count(candidate);
        if n > best.1 {
            best = (candidate, n);
        }
    }
    best.0
}

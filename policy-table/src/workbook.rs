//! Spreadsheet workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) via `calamine`.
//!
//! Only the first worksheet is read. Its first non-empty row is the header; cells are
//! rendered to text the way the spreadsheet displays them (`443`, not `443.0`) and
//! trimmed, so records look the same as those from a CSV export of the sheet.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::parser::{build_table, ParseError};
use crate::table::Table;

/// Lowercase file extensions handled as workbooks.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// Read the first worksheet of a workbook into a [`Table`].
pub fn parse_workbook(path: &Path) -> Result<Table, ParseError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::EmptyWorkbook)??;

    // Sheet row of the first range row, 0-based.
    let first_row = range.start().map(|(row, _)| u64::from(row)).unwrap_or(0);
    let mut rows = range.rows().enumerate().map(|(idx, cells)| {
        let line = first_row + idx as u64 + 1;
        (line, cells.iter().map(cell_text).collect::<Vec<_>>())
    });

    let Some((_, headers)) = rows.next() else {
        return Err(ParseError::MissingHeader);
    };
    build_table(headers, rows.collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

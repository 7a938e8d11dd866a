//! Header-keyed tabular input for spreadsheet-driven tools.
//!
//! Reads delimited text exports (comma, semicolon or tab) and spreadsheet workbooks
//! into a [`Table`] whose [`Record`]s are looked up by column name, ignoring header
//! case and spacing. It knows nothing about what the columns mean.

pub mod parser;
pub mod table;
pub mod workbook;

pub use parser::{parse, parse_file, ParseError, ParseOptions};
pub use table::{normalize_header, Record, Table};
pub use workbook::parse_workbook;

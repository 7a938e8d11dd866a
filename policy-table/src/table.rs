use std::collections::BTreeMap;

use serde::Serialize;

/// A parsed table: header row plus data records in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Header names as written in the file (trimmed, BOM removed).
    pub headers: Vec<String>,
    /// Data records, blank rows excluded.
    pub records: Vec<Record>,
}

/// One data row keyed by normalized header name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// 1-based line number in the source file.
    pub line: u64,
    /// Cell values keyed by [`normalize_header`] form of their column.
    pub cells: BTreeMap<String, String>,
}

impl Table {
    /// Return true when a column with the given name exists (case-insensitive).
    pub fn has_column(&self, name: &str) -> bool {
        let wanted = normalize_header(name);
        self.headers.iter().any(|h| normalize_header(h) == wanted)
    }

    /// Number of data records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Record {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            cells: BTreeMap::new(),
        }
    }

    /// Look up a cell by column name. Empty cells are reported as `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(&normalize_header(column))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Insert a cell, normalizing the column name.
    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.cells.insert(normalize_header(column), value.into());
    }
}

/// Canonical header key: trimmed, inner whitespace collapsed, lowercased.
pub fn normalize_header(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

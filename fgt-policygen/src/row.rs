//! Typed policy rows built from table records.
//!
//! Required fields are checked here, once, so the compiler never sees a row with a
//! blank name, address, or service list. Required headers are checked before any
//! row, so a sheet with no data rows still fails when a column is missing.

use policy_table::{Record, Table};
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, FieldLocation};
use crate::service::split_services;

/// Column headers for each row field. Matching ignores case and spacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub policy_name: String,
    pub source: String,
    pub source_subnet: String,
    pub destination: String,
    pub destination_subnet: String,
    pub service: String,
}

impl ColumnNames {
    /// Columns every sheet must have, in reporting order.
    pub fn required(&self) -> [&str; 4] {
        [
            &self.policy_name,
            &self.source,
            &self.destination,
            &self.service,
        ]
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            policy_name: "Policy Name".to_string(),
            source: "Source Address".to_string(),
            source_subnet: "Source Subnet".to_string(),
            destination: "Destination Address".to_string(),
            destination_subnet: "Destination Subnet".to_string(),
            service: "Service".to_string(),
        }
    }
}

/// One input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRow {
    pub policy_name: String,
    pub source: String,
    pub source_subnet: Option<String>,
    pub destination: String,
    pub destination_subnet: Option<String>,
    pub service: String,
}

impl PolicyRow {
    /// Build a row from a record. `row` is the 1-based data-row ordinal used in errors.
    pub fn from_record(
        row: usize,
        record: &Record,
        columns: &ColumnNames,
    ) -> Result<Self, CompileError> {
        let at = FieldLocation::Row {
            row,
            line: record.line,
        };
        let required = |column: &str| {
            record
                .get(column)
                .map(str::to_string)
                .ok_or_else(|| CompileError::MissingField {
                    at,
                    field: column.to_string(),
                })
        };
        let optional = |column: &str| record.get(column).map(str::to_string);

        let parsed = Self {
            policy_name: required(&columns.policy_name)?,
            source: required(&columns.source)?,
            source_subnet: optional(&columns.source_subnet),
            destination: required(&columns.destination)?,
            destination_subnet: optional(&columns.destination_subnet),
            service: required(&columns.service)?,
        };

        if split_services(&parsed.service).is_empty() {
            return Err(CompileError::MissingField {
                at,
                field: columns.service.clone(),
            });
        }
        Ok(parsed)
    }
}

/// Convert every record of a table, failing on the first missing header or invalid row.
pub fn rows_from_table(
    table: &Table,
    columns: &ColumnNames,
) -> Result<Vec<PolicyRow>, CompileError> {
    if let Some(column) = columns.required().into_iter().find(|c| !table.has_column(c)) {
        return Err(CompileError::MissingField {
            at: FieldLocation::Header,
            field: column.to_string(),
        });
    }

    table
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| PolicyRow::from_record(idx + 1, record, columns))
        .collect()
}

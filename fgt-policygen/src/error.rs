use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::address::CidrError;

/// Which side of a policy an address cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressRole {
    Source,
    Destination,
}

impl Display for AddressRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AddressRole::Source => write!(f, "source"),
            AddressRole::Destination => write!(f, "destination"),
        }
    }
}

/// Where a required field was found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// The header row lacks the column entirely.
    Header,
    /// A data row leaves the column empty. `line` is the sheet line, 0 when unknown.
    Row { row: usize, line: u64 },
}

impl Display for FieldLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldLocation::Header => write!(f, "header row"),
            FieldLocation::Row { row, line: 0 } => write!(f, "row {row}"),
            FieldLocation::Row { row, line } => write!(f, "row {row} (line {line})"),
        }
    }
}

/// Errors that stop a compile run.
///
/// Row numbers are 1-based data-row ordinals, the same number the row's policy gets
/// as its id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// A required column is absent from the header or empty for a row.
    #[error("{at}: missing required field '{field}'")]
    MissingField { at: FieldLocation, field: String },
    /// A subnet cell is not a usable IPv4 network.
    #[error("row {row}: invalid {role} subnet '{value}': {source}")]
    InvalidCidr {
        row: usize,
        role: AddressRole,
        value: String,
        source: CidrError,
    },
    /// A name already defined with one network is given a different one.
    #[error(
        "row {row}: {role} address '{name}' is already defined as {existing}, refusing {requested}"
    )]
    AddressConflict {
        row: usize,
        role: AddressRole,
        name: String,
        existing: String,
        requested: String,
    },
}

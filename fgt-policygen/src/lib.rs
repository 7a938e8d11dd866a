//! Spreadsheet firewall policies to FortiGate CLI configuration.
//!
//! Policy requests usually arrive as a sheet: one row per rule naming a source,
//! a destination, and a list of services. This library turns those rows into the
//! three pieces of FortiOS CLI a firewall admin pastes in, in order:
//!
//! 1. `config firewall address` — one object per named address
//! 2. `config firewall service custom` — one object per `PROTO/PORT` pair
//! 3. `config firewall policy` — one rule per row, numbered from 1
//!
//! # Architecture
//!
//! - [`row`] — typed rows from a [`policy_table::Table`], required fields checked
//! - [`address`] — address cell classification, IPv4 networks, address blocks
//! - [`service`] — service token parsing and custom service blocks
//! - [`policy`] — policy records and policy blocks
//! - [`quote`] — escaped double-quoted CLI values
//! - [`compiler`] — the single-run compiler with its dedup tables
//! - [`settings`] — TOML settings (policy defaults, column names, failure modes)
//! - [`summary`] / [`report`] — terminal output for a finished run
//!
//! # Examples
//!
//! ```ignore
//! use fgt_policygen::compiler::compile;
//! use fgt_policygen::row::rows_from_table;
//! use fgt_policygen::settings::default_settings;
//! use policy_table::{parse_file, ParseOptions};
//!
//! let table = parse_file(Path::new("policies.csv"), &ParseOptions::default())?;
//! let settings = default_settings();
//! let rows = rows_from_table(&table, &settings.columns)?;
//! let output = compile(&rows, settings.compile_options())?;
//! println!("{}", output.policies.join("\n"));
//! ```
//!
//! The library does no I/O and keeps no state between runs.

pub mod address;
pub mod compiler;
pub mod error;
pub mod policy;
pub mod quote;
pub mod report;
pub mod row;
pub mod service;
pub mod settings;
pub mod summary;

//! Policy rows to FortiGate CLI blocks.
//!
//! ## Pipeline
//!
//! Each row is handled in input order:
//!
//! 1. **Services** — `PROTO/PORT` tokens become `PROTO-PORT` custom services, defined
//!    once per run; other tokens are passed through as existing service names
//! 2. **Addresses** — named source/destination cells get an address object the first
//!    time they are seen with a subnet; `any` and IP literals are used as written
//! 3. **Policy** — one policy block, id = row ordinal (1-based)
//!
//! ## Deduplication
//!
//! A [`PolicyCompiler`] owns the address and service tables for exactly one run.
//! Keys are unique within a run and the first definition of a key is final.
//!
//! ## Degraded rows
//!
//! Bad subnets and conflicting redefinitions are either fatal or recorded as
//! [`CompileWarning`]s, depending on [`CompileOptions`]. Names that never get an
//! object are reported as `unresolved_address` warnings once all rows are in.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::address::{AddressObject, AddressRef, Ipv4Network};
use crate::error::{AddressRole, CompileError};
use crate::policy::{PolicyDefaults, PolicyRecord};
use crate::row::PolicyRow;
use crate::service::{split_services, ServiceObject, ServiceRef};

/// What to do with a subnet cell that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidCidrMode {
    /// Leave the address undefined, warn, and still emit the policy.
    #[default]
    Skip,
    /// Fail the whole run.
    Abort,
}

/// What to do when a defined name shows up again with a different network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressConflictMode {
    /// Keep the first definition and warn.
    #[default]
    FirstWins,
    /// Fail the whole run.
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    pub on_invalid_cidr: InvalidCidrMode,
    pub on_address_conflict: AddressConflictMode,
    #[serde(skip)]
    pub defaults: PolicyDefaults,
}

/// A row-level problem that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileWarning {
    pub row: usize,
    pub code: String,
    pub message: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileOutput {
    /// Rendered address blocks, in definition order.
    pub addresses: Vec<String>,
    /// Rendered service blocks, in definition order.
    pub services: Vec<String>,
    /// Rendered policy blocks, one per row.
    pub policies: Vec<String>,
    pub address_objects: Vec<AddressObject>,
    pub service_objects: Vec<ServiceObject>,
    pub records: Vec<PolicyRecord>,
    pub warnings: Vec<CompileWarning>,
}

/// Single-run compiler. Build one per batch.
#[derive(Debug, Default)]
pub struct PolicyCompiler {
    options: CompileOptions,
    address_index: BTreeMap<String, usize>,
    service_index: BTreeSet<String>,
    out: CompileOutput,
}

impl PolicyCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Compile all rows and hand back the output.
    pub fn compile(mut self, rows: &[PolicyRow]) -> Result<CompileOutput, CompileError> {
        for (idx, row) in rows.iter().enumerate() {
            self.push_row(idx + 1, row)?;
        }
        self.report_unresolved();
        Ok(self.out)
    }

    fn push_row(&mut self, id: usize, row: &PolicyRow) -> Result<(), CompileError> {
        let services = self.resolve_services(&row.service);
        let source = self.resolve_address(
            id,
            AddressRole::Source,
            &row.source,
            row.source_subnet.as_deref(),
        )?;
        let destination = self.resolve_address(
            id,
            AddressRole::Destination,
            &row.destination,
            row.destination_subnet.as_deref(),
        )?;

        let record = PolicyRecord {
            id,
            name: row.policy_name.clone(),
            source,
            destination,
            services,
        };
        self.out.policies.push(record.render(&self.options.defaults));
        self.out.records.push(record);
        Ok(())
    }

    fn resolve_services(&mut self, field: &str) -> Vec<ServiceRef> {
        let mut refs: Vec<ServiceRef> = Vec::new();
        for token in split_services(field) {
            let svc = ServiceRef::parse(token);
            if let ServiceRef::Custom { protocol, port } = &svc {
                let object = ServiceObject::new(*protocol, port);
                if self.service_index.insert(object.name.clone()) {
                    self.out.services.push(object.render());
                    self.out.service_objects.push(object);
                }
            }
            if !refs.iter().any(|r| r.reference() == svc.reference()) {
                refs.push(svc);
            }
        }
        refs
    }

    fn resolve_address(
        &mut self,
        row: usize,
        role: AddressRole,
        value: &str,
        subnet: Option<&str>,
    ) -> Result<AddressRef, CompileError> {
        let address = AddressRef::classify(value);
        let Some(name) = address.name() else {
            return Ok(address);
        };
        let Some(subnet) = subnet.map(str::trim).filter(|s| !s.is_empty()) else {
            if !self.address_index.contains_key(name) {
                self.warn(
                    row,
                    "missing_subnet",
                    format!("{role} address '{name}' has no subnet; no address object created"),
                );
            }
            return Ok(address);
        };

        let network = match Ipv4Network::parse(subnet) {
            Ok(network) => network,
            Err(source) => match self.options.on_invalid_cidr {
                InvalidCidrMode::Abort => {
                    return Err(CompileError::InvalidCidr {
                        row,
                        role,
                        value: subnet.to_string(),
                        source,
                    });
                }
                // Nothing is skipped when an earlier row already defined the name.
                InvalidCidrMode::Skip if self.address_index.contains_key(name) => {
                    return Ok(address);
                }
                InvalidCidrMode::Skip => {
                    self.warn(
                        row,
                        "invalid_cidr",
                        format!("{role} subnet '{subnet}' for '{name}' skipped: {source}"),
                    );
                    return Ok(address);
                }
            },
        };

        if let Some(&idx) = self.address_index.get(name) {
            let existing = self.out.address_objects[idx].subnet;
            if existing != network {
                match self.options.on_address_conflict {
                    AddressConflictMode::Error => {
                        return Err(CompileError::AddressConflict {
                            row,
                            role,
                            name: name.to_string(),
                            existing: existing.to_string(),
                            requested: network.to_string(),
                        });
                    }
                    AddressConflictMode::FirstWins => self.warn(
                        row,
                        "address_conflict",
                        format!("{role} address '{name}' keeps {existing}; ignoring {network}"),
                    ),
                }
            }
            return Ok(address);
        }

        let object = AddressObject {
            name: name.to_string(),
            subnet: network,
        };
        self.address_index
            .insert(object.name.clone(), self.out.address_objects.len());
        self.out.addresses.push(object.render());
        self.out.address_objects.push(object);
        Ok(address)
    }

    /// Warn once per named reference that no row ever defined.
    fn report_unresolved(&mut self) {
        let mut reported = BTreeSet::new();
        let mut pending = Vec::new();
        for record in &self.out.records {
            for address in [&record.source, &record.destination] {
                let Some(name) = address.name() else {
                    continue;
                };
                if !self.address_index.contains_key(name) && reported.insert(name.to_string()) {
                    pending.push((record.id, name.to_string()));
                }
            }
        }
        for (row, name) in pending {
            self.warn(
                row,
                "unresolved_address",
                format!("address '{name}' is referenced but never defined in this run"),
            );
        }
    }

    fn warn(&mut self, row: usize, code: &str, message: String) {
        self.out.warnings.push(CompileWarning {
            row,
            code: code.to_string(),
            message,
        });
    }
}

/// Compile rows with the given options.
pub fn compile(
    rows: &[PolicyRow],
    options: CompileOptions,
) -> Result<CompileOutput, CompileError> {
    PolicyCompiler::new(options).compile(rows)
}

use serde::Serialize;

use crate::compiler::CompileOutput;
use crate::service::ServiceRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
    pub rows: usize,
    pub addresses: usize,
    pub services: usize,
    pub policies: usize,
    pub opaque_services: usize,
    pub warnings: usize,
}

pub fn summarize(rows: usize, output: &CompileOutput) -> CompileSummary {
    CompileSummary {
        rows,
        addresses: output.addresses.len(),
        services: output.services.len(),
        policies: output.policies.len(),
        opaque_services: count_opaque_services(output),
        warnings: output.warnings.len(),
    }
}

pub fn render(summary: CompileSummary) -> String {
    format!(
        "compile_summary rows={} addresses={} services={} policies={} opaque_services={} warnings={}",
        summary.rows,
        summary.addresses,
        summary.services,
        summary.policies,
        summary.opaque_services,
        summary.warnings
    )
}

/// Distinct service names referenced but not defined by this run.
fn count_opaque_services(output: &CompileOutput) -> usize {
    let mut names: Vec<String> = output
        .records
        .iter()
        .flat_map(|r| r.services.iter())
        .filter(|s| matches!(s, ServiceRef::Opaque { .. }))
        .map(ServiceRef::reference)
        .collect();
    names.sort();
    names.dedup();
    names.len()
}

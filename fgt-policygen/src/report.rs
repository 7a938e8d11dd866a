use colored::Colorize;

use crate::compiler::{CompileOutput, CompileWarning};

/// Render one warning as a `warning: row N: ...` line.
pub fn render_warning(warning: &CompileWarning) -> String {
    format!(
        "{} row {}: {} [{}]",
        "warning:".yellow(),
        warning.row,
        warning.message,
        warning.code
    )
}

/// Render all warnings, one per line, in the order they were raised.
pub fn render_warnings(warnings: &[CompileWarning]) -> String {
    warnings
        .iter()
        .map(render_warning)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One artifact's text: its blocks joined by newlines.
pub fn join_blocks(blocks: &[String]) -> String {
    blocks.join("\n")
}

/// All three artifacts in apply order (addresses, services, policies).
pub fn render_combined(output: &CompileOutput) -> String {
    [&output.addresses, &output.services, &output.policies]
        .into_iter()
        .filter(|blocks| !blocks.is_empty())
        .map(|blocks| join_blocks(blocks))
        .collect::<Vec<_>>()
        .join("\n")
}

use anyhow::{bail, Result};
use fgt_policygen::report::render_warnings;
use fgt_policygen::summary::{render as render_summary, summarize};

use crate::cli::{CheckArgs, OutputFormat};
use crate::sheet::compile_sheet;

pub fn run_check(args: CheckArgs) -> Result<()> {
    let compiled = compile_sheet(&args.sheet)?;
    let output = &compiled.output;
    let summary = summarize(compiled.rows, output);

    if !output.warnings.is_empty() {
        eprintln!("{}", render_warnings(&output.warnings));
    }

    match args.sheet.format {
        OutputFormat::Text => println!("{}", render_summary(summary)),
        OutputFormat::Json => {
            let report = serde_json::json!({
                "summary": summary,
                "warnings": output.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if args.sheet.strict && !output.warnings.is_empty() {
        bail!(
            "check failed in strict mode: {} warnings",
            output.warnings.len()
        );
    }
    Ok(())
}

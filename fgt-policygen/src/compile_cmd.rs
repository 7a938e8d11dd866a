use anyhow::{bail, Result};
use fgt_policygen::report::{render_combined, render_warnings};
use fgt_policygen::summary::{render as render_summary, summarize};

use crate::artifacts::write_artifacts;
use crate::cli::{CompileArgs, OutputFormat};
use crate::sheet::compile_sheet;

pub fn run_compile(args: CompileArgs) -> Result<()> {
    let compiled = compile_sheet(&args.sheet)?;
    let output = &compiled.output;

    let written = write_artifacts(&args.out_dir, &args.sheet.input, output)?;

    if !output.warnings.is_empty() {
        eprintln!("{}", render_warnings(&output.warnings));
    }

    let summary = summarize(compiled.rows, output);
    match args.sheet.format {
        OutputFormat::Text => {
            if args.print {
                println!("{}", render_combined(output));
            }
            println!("{}", render_summary(summary));
            for path in &written {
                println!("wrote {}", path.display());
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "summary": summary,
                "artifacts": written,
                "output": output,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if args.sheet.strict && !output.warnings.is_empty() {
        bail!(
            "compile failed in strict mode: {} warnings",
            output.warnings.len()
        );
    }
    Ok(())
}

use anyhow::{bail, Context, Result};
use fgt_policygen::compiler::{compile, CompileOutput};
use fgt_policygen::row::rows_from_table;
use fgt_policygen::settings::{default_settings, load_settings, Settings};
use policy_table::{parse_file, ParseOptions};
use tracing::{debug, info};

use crate::cli::SheetArgs;

/// A compiled sheet plus the row count it came from.
pub struct CompiledSheet {
    pub rows: usize,
    pub output: CompileOutput,
}

/// Read the sheet named in `args`, validate its rows, and compile them.
pub fn compile_sheet(args: &SheetArgs) -> Result<CompiledSheet> {
    let settings = resolve_settings(args)?;

    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => bail!("delimiter '{c}' is not a single ASCII character"),
        None => None,
    };
    let table = parse_file(&args.input, &ParseOptions { delimiter })
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    info!(
        path = %args.input.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "read policy sheet"
    );

    let rows = rows_from_table(&table, &settings.columns)
        .with_context(|| format!("invalid row in {}", args.input.display()))?;

    let mut options = settings.compile_options();
    if let Some(mode) = args.on_invalid_cidr {
        options.on_invalid_cidr = mode.into();
    }
    if let Some(mode) = args.on_address_conflict {
        options.on_address_conflict = mode.into();
    }
    debug!(?options, "compile options");

    let output = compile(&rows, options)
        .with_context(|| format!("failed to compile {}", args.input.display()))?;
    Ok(CompiledSheet {
        rows: rows.len(),
        output,
    })
}

fn resolve_settings(args: &SheetArgs) -> Result<Settings> {
    match &args.config {
        Some(path) => {
            let settings = load_settings(path)?;
            info!(path = %path.display(), "loaded settings");
            Ok(settings)
        }
        None => Ok(default_settings()),
    }
}

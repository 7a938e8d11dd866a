use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Fail when writing `output` would clobber the policy sheet it was generated from.
pub fn ensure_not_input(output: &Path, input: &Path) -> Result<()> {
    let out_norm = absolute(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let in_norm = absolute(input)
        .with_context(|| format!("failed to resolve input path {}", input.display()))?;

    if out_norm == in_norm {
        bail!(
            "refusing to overwrite input sheet: artifact {} is the input {}",
            output.display(),
            input.display()
        );
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: join with cwd without resolving `..`.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };
    Ok(base.join(path))
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fgt_policygen::compiler::CompileOutput;
use fgt_policygen::report::join_blocks;
use tracing::info;

use crate::path_guard::ensure_not_input;

pub const ADDRESSES_FILE: &str = "addresses.txt";
pub const SERVICES_FILE: &str = "services.txt";
pub const POLICIES_FILE: &str = "policies.txt";

/// Write the three artifacts into `dir`, creating it if needed.
///
/// Every artifact is written, even an empty one, so a re-run never leaves a stale
/// file from a previous sheet behind.
pub fn write_artifacts(dir: &Path, input: &Path, output: &CompileOutput) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let artifacts = [
        (ADDRESSES_FILE, &output.addresses),
        (SERVICES_FILE, &output.services),
        (POLICIES_FILE, &output.policies),
    ];

    for (file_name, _) in &artifacts {
        ensure_not_input(&dir.join(file_name), input)?;
    }

    let mut written = Vec::with_capacity(artifacts.len());
    for (file_name, blocks) in artifacts {
        let path = dir.join(file_name);
        fs::write(&path, join_blocks(blocks))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), blocks = blocks.len(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

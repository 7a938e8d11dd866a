use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::compiler::CompileOptions;
use crate::policy::PolicyDefaults;
use crate::row::ColumnNames;

/// Run settings: policy defaults, input column names, and failure modes.
///
/// Every section and key is optional; anything left out keeps its built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub policy: PolicyDefaults,
    pub columns: ColumnNames,
    pub compile: CompileOptions,
}

impl Settings {
    /// Compile options with the policy defaults folded in.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            defaults: self.policy.clone(),
            ..self.compile.clone()
        }
    }
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_settings(&raw, path.display().to_string())
}

/// Built-in settings shipped with the tool.
pub fn default_settings() -> Settings {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/defaults/policygen.toml"
    ));
    parse_settings(embedded, "embedded settings".to_string()).unwrap_or_default()
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::Parse { path, source })
}

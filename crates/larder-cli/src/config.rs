use larder_core::error::LarderError;
use larder_core::store::csv_file::DEFAULT_STORE_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "larder.toml";

/// Settings read from `larder.toml`. Every field is optional; command-line
/// flags take precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LarderConfig {
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

impl LarderConfig {
    pub fn load(path: &Path) -> Result<Self, LarderError> {
        let content = std::fs::read_to_string(path).map_err(|e| LarderError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, LarderError> {
        toml::from_str(content).map_err(|e| LarderError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// An explicit path must exist; the default file is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, LarderError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn store_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.store_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }

    /// `None` means the builtin preset.
    pub fn rules_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.rules_path.clone())
    }

    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.output).unwrap_or_default()
    }
}

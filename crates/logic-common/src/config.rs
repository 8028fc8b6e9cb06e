//! `logic.toml` configuration.
//!
//! Every section and field is optional; a missing file section falls back to
//! the defaults below.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the library spliced ahead of every program when
/// [`AnalysisConfig::prelude`] is enabled.
pub const PRELUDE_LIBRARY: &str = "Prelude";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogicConfig {
    pub analysis: AnalysisConfig,
    pub library: LibraryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Splice the `Prelude` library into every program when it can be found.
    pub prelude: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { prelude: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directories searched for `<Name>.logic.json` library files, in order.
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl LogicConfig {
    /// Read and parse a configuration file.
    ///
    /// Relative library paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            for lib in &mut config.library.paths {
                if lib.is_relative() {
                    *lib = base.join(&*lib);
                }
            }
        }
        Ok(config)
    }

    /// Parse a configuration from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

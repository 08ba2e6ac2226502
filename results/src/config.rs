use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Result directory used when nothing else is configured.
pub const DEFAULT_RESULT_DIR: &str = "results";
/// Scenarios directory used when nothing else is configured.
pub const DEFAULT_SCENARIOS_DIR: &str = "scenarios";

/// Settings read from a TOML config file.
///
/// ```toml
/// result_dir = "/var/lib/bench/results"
/// scenarios_dir = "scenarios"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub result_dir: Option<PathBuf>,
    pub scenarios_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The directories a command works on.
#[derive(Debug, Clone, PartialEq)]
pub struct Dirs {
    pub result_dir: PathBuf,
    pub scenarios_dir: PathBuf,
}

impl Dirs {
    /// Pick each directory from the command line or environment first, then the config file, then
    /// the default.
    pub fn resolve(
        result_dir: Option<PathBuf>,
        scenarios_dir: Option<PathBuf>,
        file: FileConfig,
    ) -> Self {
        Self {
            result_dir: result_dir
                .or(file.result_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULT_DIR)),
            scenarios_dir: scenarios_dir
                .or(file.scenarios_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIOS_DIR)),
        }
    }
}

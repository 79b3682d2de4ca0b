//! Config file handling
//!
//! Reads optional defaults from `config.toml` in the config directory.
//! Everything in the file can be overridden on the command line.

use crate::infra::dirs::BuildrepoDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Directory settings
    #[serde(default)]
    pub paths: PathsConfig,

    /// Build policy defaults
    #[serde(default)]
    pub build: BuildDefaults,
}

/// `[paths]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// aports base directory
    pub aportsdir: Option<PathBuf>,

    /// Destination repository base directory
    pub repodest: Option<PathBuf>,

    /// Build log root
    pub logdir: Option<PathBuf>,
}

/// `[build]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDefaults {
    /// Build tool program
    pub abuild: Option<String>,

    /// Target architecture
    pub arch: Option<String>,

    /// Continue after build failures
    pub keep_going: Option<bool>,

    /// Purge obsolete artifacts after building
    pub purge: Option<bool>,

    /// Skip recipes whose previous build failed
    pub skip_failed: Option<bool>,

    /// Repositories whose artifacts satisfy dependencies
    #[serde(default)]
    pub deps_repos: Vec<String>,
}

impl GlobalConfig {
    /// Load `config.toml` from the config directory
    ///
    /// A missing file yields the default configuration.
    pub fn load(dirs: &BuildrepoDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.config_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}

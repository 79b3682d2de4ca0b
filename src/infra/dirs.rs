//! Platform-specific directory management
//!
//! Provides the config directory and the home-relative defaults for the
//! aports tree and the package destination.
//!
//! Environment variables can override default directories:
//! - `BUILDREPO_CONFIG_DIR` - Override config directory

use std::env;
use std::path::PathBuf;

/// Environment variable name for the config directory override
pub const ENV_CONFIG_DIR: &str = "BUILDREPO_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "buildrepo";

/// Default aports checkout, relative to the home directory
const APORTS_SUBDIR: &str = "aports";

/// Default package destination, relative to the home directory
const PACKAGES_SUBDIR: &str = "packages";

/// Platform-specific directory provider for buildrepo
#[derive(Debug, Clone)]
pub struct BuildrepoDirs {
    config_dir: PathBuf,
    home_dir: PathBuf,
}

impl BuildrepoDirs {
    /// Create a new `BuildrepoDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Get the config file path (`config.toml` in the config directory)
    ///
    /// - Linux: `$XDG_CONFIG_HOME/buildrepo/config.toml` or `~/.config/buildrepo/config.toml`
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default aports base directory (`~/aports`)
    #[must_use]
    pub fn default_aports_dir(&self) -> PathBuf {
        self.home_dir.join(APORTS_SUBDIR)
    }

    /// Default destination repository base directory (`~/packages`)
    #[must_use]
    pub fn default_repo_dest(&self) -> PathBuf {
        self.home_dir.join(PACKAGES_SUBDIR)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for BuildrepoDirs {
    fn default() -> Self {
        Self::new()
    }
}

//! Per-recipe build log locations
//!
//! Logs live at `<root>/<name>/<name>-<version>-r<release>.log`.

use std::path::{Path, PathBuf};

use crate::config::defaults::LOG_SUFFIX;
use crate::core::recipe::Recipe;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Log file for `recipe` under `log_root`, creating its directory
///
/// `None` means logging is disabled and the build keeps the orchestrator's
/// stdout and stderr. A returned path always has an existing parent.
pub fn resolve(log_root: Option<&Path>, recipe: &Recipe) -> Result<Option<PathBuf>, FilesystemError> {
    let Some(root) = log_root else {
        return Ok(None);
    };

    let dir = root.join(&recipe.name);
    filesystem::create_dir_all(&dir)?;

    Ok(Some(dir.join(format!(
        "{}-{}{LOG_SUFFIX}",
        recipe.name,
        recipe.full_version()
    ))))
}

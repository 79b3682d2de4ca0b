//! Obsolete artifact purging
//!
//! After a build pass, every `.apk` in the repository output directory that no
//! current recipe produces is removed. Other files (the index, signatures)
//! are never touched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::defaults::ARTIFACT_SUFFIX;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Result of a purge pass
#[derive(Debug, Default)]
pub struct PurgeResult {
    /// Obsolete artifacts, removed unless this was a dry run
    pub deleted: Vec<PathBuf>,
    /// Artifacts kept because a recipe still produces them
    pub kept: usize,
}

/// Build the retain set from artifact file names
pub fn retain_set<I, S>(artifacts: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    artifacts.into_iter().map(Into::into).collect()
}

/// Remove every artifact in `output_dir` that is not in `retain`
///
/// In a dry run candidates are only reported. Either way they are counted in
/// [`PurgeResult::deleted`]. A missing `output_dir` purges nothing.
pub fn reconcile(
    retain: &HashSet<String>,
    output_dir: &Path,
    dry_run: bool,
) -> Result<PurgeResult, FilesystemError> {
    let mut result = PurgeResult::default();

    let mut files = filesystem::list_files(output_dir)?;
    files.sort();

    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(ARTIFACT_SUFFIX) {
            continue;
        }
        if retain.contains(name) {
            result.kept += 1;
            continue;
        }

        if dry_run {
            println!("Would delete {}", path.display());
        } else {
            println!("Deleting {}", path.display());
            filesystem::remove_file(&path)?;
        }
        result.deleted.push(path);
    }

    tracing::info!(
        "Purged {} obsolete artifacts from {} ({} kept)",
        result.deleted.len(),
        output_dir.display(),
        result.kept
    );

    Ok(result)
}

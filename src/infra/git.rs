//! Git operations
//!
//! Reads the checked-out revision of the aports tree using the gix crate.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Length of the abbreviated commit id used in index descriptions
pub const SHORT_SHA_LEN: usize = 12;

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Not a git repository
    #[error("Invalid repository at '{path}': {error}")]
    InvalidRepository { path: PathBuf, error: String },

    /// HEAD could not be resolved to a commit
    #[error("Failed to resolve HEAD in '{path}': {error}")]
    ResolveFailed { path: PathBuf, error: String },
}

/// Resolve HEAD of the repository at `repo_path` to an abbreviated commit id
pub fn head_short_sha(repo_path: &Path) -> Result<String, GitError> {
    let repo = gix::open(repo_path).map_err(|e| GitError::InvalidRepository {
        path: repo_path.to_path_buf(),
        error: e.to_string(),
    })?;

    let head = repo.head_id().map_err(|e| GitError::ResolveFailed {
        path: repo_path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut sha = head.to_hex().to_string();
    sha.truncate(SHORT_SHA_LEN);
    Ok(sha)
}

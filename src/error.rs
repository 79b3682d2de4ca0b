//! Error types for buildrepo
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to list directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to rename file
    #[error("Failed to rename '{from}' to '{to}': {error}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Recipe (APKBUILD) parsing errors
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Required variable missing from the recipe
    #[error("Recipe '{path}' is missing required variable '{field}'")]
    MissingField { path: PathBuf, field: String },

    /// Release number is not a non-negative integer
    #[error("Recipe '{path}' has invalid pkgrel '{value}'")]
    InvalidRelease { path: PathBuf, value: String },

    /// Could not read the recipe file
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Dependency resolution errors
#[derive(Error, Debug)]
pub enum ResolverError {
    /// A requested recipe is not part of the repository
    #[error("Recipe '{name}' is not part of the repository")]
    UnknownRecipe { name: String },
}

/// Package database errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Repository directory does not exist in the aports tree
    #[error("Repository '{repo}' not found at '{path}'")]
    RepositoryNotFound { repo: String, path: PathBuf },

    /// Build order could not be computed
    #[error("Failed to order recipes: {0}")]
    Resolver(#[from] ResolverError),

    /// Filesystem error while scanning the repository
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// External process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Program could not be started
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Output redirection target could not be opened
    #[error("Failed to open log file '{path}': {error}")]
    Redirect { path: PathBuf, error: String },

    /// Program exited with a non-zero status
    #[error("'{program}' exited with status {code}")]
    Failed { program: String, code: i32 },
}

/// Index publishing errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// An indexing or signing step failed
    #[error("Failed to update index in '{path}': {source}")]
    Process {
        path: PathBuf,
        #[source]
        source: ProcessError,
    },

    /// Filesystem error while publishing
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Top-level orchestration error type
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// A recipe failed to build and keep-going is disabled
    #[error("Failed to build '{recipe}' in repository '{repo}' (exit status {code})")]
    BuildFailed {
        repo: String,
        recipe: String,
        code: i32,
    },

    /// Package database error
    #[error("Repository '{repo}': {source}")]
    Database {
        repo: String,
        #[source]
        source: DatabaseError,
    },

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Index publishing error
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

impl OrchestratorError {
    /// Process exit status for this error
    ///
    /// Build failures propagate the build tool's status; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BuildFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

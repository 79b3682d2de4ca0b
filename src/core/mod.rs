//! Core logic module
//!
//! Filesystem and process access goes through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`recipe`] - APKBUILD parsing and artifact naming
//! - [`resolver`] - Dependency ordering
//! - [`database`] - Per-repository recipe database
//! - [`skip`] - Previously-failed build detection
//! - [`log_path`] - Build log locations
//! - [`executor`] - Running the build tool
//! - [`purge`] - Obsolete artifact removal
//! - [`index`] - Repository index publishing
//! - [`stats`] - Run statistics
//! - [`orchestrator`] - The per-repository build loop
//! - [`config`] - Resolved run configuration
//! - [`global_config`] - Config file handling

pub mod config;
pub mod database;
pub mod executor;
pub mod global_config;
pub mod index;
pub mod log_path;
pub mod orchestrator;
pub mod purge;
pub mod recipe;
pub mod resolver;
pub mod skip;
pub mod stats;

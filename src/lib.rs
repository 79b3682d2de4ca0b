//! buildrepo - build aports repositories in dependency order
//!
//! Walks one or more aports repositories, builds every recipe whose artifact
//! is missing with the external build tool, optionally purges artifacts no
//! recipe produces any more, and refreshes the signed repository index.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Recipe database, ordering and the build loop
//! - [`infra`] - Infrastructure layer (filesystem, processes, git)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;

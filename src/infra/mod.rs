//! Infrastructure layer
//!
//! Handles filesystem access, external processes, and git metadata.
//! This module is where the side effects live; [`crate::core`] composes them.

pub mod dirs;
pub mod filesystem;
pub mod git;
pub mod process;

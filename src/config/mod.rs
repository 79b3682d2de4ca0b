//! Configuration and constants
//!
//! - [`defaults`] - Default values, tool names and file layout constants

pub mod defaults;

//! Command-line interface for hiertt-forge.
//!
//! Provides commands for table export, GRP generation and uid renumbering.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli, Commands};

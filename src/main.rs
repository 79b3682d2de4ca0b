//! buildrepo - build aports repositories in dependency order
//!
//! Entry point for the buildrepo command-line application.

use std::io::IsTerminal;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use buildrepo::cli::output::{display_error, log_level};
use buildrepo::cli::Cli;
use buildrepo::error::OrchestratorError;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version are not errors
            let _ = e.print();
            std::process::exit(i32::from(e.use_stderr()));
        }
    };

    // Diagnostics on stderr; stdout carries progress and the summary
    let level = LevelFilter::from_level(log_level(cli.verbose, cli.quiet));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    if let Err(e) = cli.run() {
        display_error(&e);
        let code = e
            .downcast_ref::<OrchestratorError>()
            .map_or(1, OrchestratorError::exit_code);
        std::process::exit(code);
    }
}

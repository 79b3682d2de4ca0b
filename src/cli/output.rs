//! Output formatting
//!
//! Progress lines and the run summary go to stdout; diagnostics go to stderr
//! so the two can be captured separately.

use anyhow::Result;

use crate::core::stats::StatsCollector;

/// Status message prefixes
pub mod status {
    /// Error prefix (red X)
    pub const ERROR: &str = "✗";
}

/// Log level implied by the verbosity flags
pub fn log_level(verbose: u8, quiet: bool) -> tracing::Level {
    if quiet {
        return tracing::Level::ERROR;
    }
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    }
}

/// Print the end-of-run statistics
pub fn print_summary(stats: &StatsCollector, json: bool) -> Result<()> {
    if json {
        println!("{}", stats.render_json()?);
    } else {
        print!("{}", stats.render_text());
    }
    Ok(())
}

/// Print a fatal error and its causes to stderr
pub fn display_error(err: &anyhow::Error) {
    eprintln!("{} {err}", status::ERROR);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

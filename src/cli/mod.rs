//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::core::config::{BuildConfig, ConfigOverrides};
use crate::core::executor::{AbuildExecutor, DryRunExecutor, RecipeBuilder};
use crate::core::global_config::GlobalConfig;
use crate::core::index::ApkIndexPublisher;
use crate::core::orchestrator::Orchestrator;
use crate::infra::dirs::BuildrepoDirs;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    "\nbuilt:  ",
    env!("VERGEN_BUILD_DATE"),
    "\ntarget: ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

/// buildrepo - build aports repositories in dependency order
///
/// Builds every recipe of each REPO whose artifact is missing, then
/// optionally purges obsolete artifacts and refreshes the repository index.
#[derive(Parser, Debug)]
#[command(name = "buildrepo")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// aports base directory [default: ~/aports]
    #[arg(short = 'a', long, env = "APORTSDIR", value_name = "DIR")]
    pub aportsdir: Option<PathBuf>,

    /// Destination repository base directory [default: ~/packages]
    #[arg(short = 'd', long, env = "REPODEST", value_name = "DIR")]
    pub repodest: Option<PathBuf>,

    /// Write per-recipe build logs under DIR instead of the terminal
    #[arg(short = 'l', long, value_name = "DIR")]
    pub logdir: Option<PathBuf>,

    /// Keep going after a failed build
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Show what would be built or deleted without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Delete artifacts that no recipe produces any more
    #[arg(short = 'p', long)]
    pub purge: bool,

    /// Skip recipes whose previous build failed
    #[arg(short = 's', long)]
    pub skip_failed: bool,

    /// Also satisfy dependencies from REPO's artifacts (repeatable)
    #[arg(short = 'r', long = "deps-repo", value_name = "REPO")]
    pub deps_repos: Vec<String>,

    /// Target architecture [default: host]
    #[arg(long, env = "CARCH")]
    pub arch: Option<String>,

    /// Build tool to run in each recipe directory [default: abuild]
    #[arg(long, env = "ABUILD", value_name = "PROGRAM")]
    pub abuild: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Repositories to build, in order
    #[arg(value_name = "REPO", required = true)]
    pub repos: Vec<String>,
}

impl Cli {
    /// Command-line values as configuration overrides
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            aports_dir: self.aportsdir.clone(),
            repo_dest: self.repodest.clone(),
            log_dir: self.logdir.clone(),
            arch: self.arch.clone(),
            build_tool: self.abuild.clone(),
            keep_going: self.keep_going,
            dry_run: self.dry_run,
            purge: self.purge,
            skip_failed: self.skip_failed,
            dependency_repos: self.deps_repos.clone(),
            repos: self.repos.clone(),
        }
    }

    /// Resolve configuration, run every repository and print the summary
    pub fn run(self) -> Result<()> {
        let dirs = BuildrepoDirs::new();
        let file = GlobalConfig::load(&dirs)?;
        let config = BuildConfig::resolve(self.overrides(), &file, &dirs);
        tracing::debug!("Resolved configuration: {config:?}");

        let builder: Box<dyn RecipeBuilder> = if config.dry_run {
            Box::new(DryRunExecutor)
        } else {
            which::which(&config.build_tool).with_context(|| {
                format!("Build tool '{}' not found in PATH", config.build_tool)
            })?;
            Box::new(AbuildExecutor::new(&config.build_tool))
        };

        let mut orchestrator = Orchestrator::new(
            &config,
            config.aports_source(),
            builder,
            Box::new(ApkIndexPublisher::default()),
        );
        let stats = orchestrator.run()?;

        output::print_summary(&stats, self.json)
    }
}

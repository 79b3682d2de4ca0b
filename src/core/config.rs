//! Run configuration
//!
//! [`BuildConfig`] is resolved once from command-line values, the config
//! file and built-in defaults, then handed to the orchestrator read-only.

use std::path::PathBuf;

use crate::config::defaults::{host_arch, DEFAULT_BUILD_TOOL};
use crate::core::database::AportsSource;
use crate::core::global_config::GlobalConfig;
use crate::infra::dirs::BuildrepoDirs;
use crate::infra::filesystem::absolute;

/// Values given on the command line (or through their environment variables)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// aports base directory
    pub aports_dir: Option<PathBuf>,
    /// Destination repository base directory
    pub repo_dest: Option<PathBuf>,
    /// Build log root
    pub log_dir: Option<PathBuf>,
    /// Target architecture
    pub arch: Option<String>,
    /// Build tool program
    pub build_tool: Option<String>,
    /// Continue after build failures
    pub keep_going: bool,
    /// Report only, change nothing
    pub dry_run: bool,
    /// Purge obsolete artifacts
    pub purge: bool,
    /// Skip recipes whose previous build failed
    pub skip_failed: bool,
    /// Extra dependency repositories
    pub dependency_repos: Vec<String>,
    /// Repositories to build, in order
    pub repos: Vec<String>,
}

/// Immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// aports base directory
    pub aports_dir: PathBuf,
    /// Destination repository base directory
    pub repo_dest: PathBuf,
    /// Build log root; `None` keeps build output on the terminal
    pub log_dir: Option<PathBuf>,
    /// Target architecture
    pub arch: String,
    /// Build tool program
    pub build_tool: String,
    /// Continue after build failures
    pub keep_going: bool,
    /// Report only, change nothing
    pub dry_run: bool,
    /// Purge obsolete artifacts
    pub purge: bool,
    /// Skip recipes whose previous build failed
    pub skip_failed: bool,
    /// Repositories whose artifacts satisfy dependencies
    pub dependency_repos: Vec<String>,
    /// Repositories to build, in order
    pub repos: Vec<String>,
}

impl BuildConfig {
    /// Resolve command-line values over the config file over defaults
    ///
    /// Flags set on the command line cannot be switched off by the file.
    pub fn resolve(cli: ConfigOverrides, file: &GlobalConfig, dirs: &BuildrepoDirs) -> Self {
        let mut dependency_repos = file.build.deps_repos.clone();
        for repo in cli.dependency_repos {
            if !dependency_repos.contains(&repo) {
                dependency_repos.push(repo);
            }
        }

        Self {
            aports_dir: absolute(
                cli.aports_dir
                    .or_else(|| file.paths.aportsdir.clone())
                    .unwrap_or_else(|| dirs.default_aports_dir()),
            ),
            repo_dest: absolute(
                cli.repo_dest
                    .or_else(|| file.paths.repodest.clone())
                    .unwrap_or_else(|| dirs.default_repo_dest()),
            ),
            log_dir: cli
                .log_dir
                .or_else(|| file.paths.logdir.clone())
                .map(absolute),
            arch: cli
                .arch
                .or_else(|| file.build.arch.clone())
                .unwrap_or_else(|| host_arch().to_string()),
            build_tool: cli
                .build_tool
                .or_else(|| file.build.abuild.clone())
                .unwrap_or_else(|| DEFAULT_BUILD_TOOL.to_string()),
            keep_going: cli.keep_going || file.build.keep_going.unwrap_or(false),
            dry_run: cli.dry_run,
            purge: cli.purge || file.build.purge.unwrap_or(false),
            skip_failed: cli.skip_failed || file.build.skip_failed.unwrap_or(false),
            dependency_repos,
            repos: cli.repos,
        }
    }

    /// Directory holding the artifacts of `repo`
    pub fn output_dir(&self, repo: &str) -> PathBuf {
        self.repo_dest.join(repo).join(&self.arch)
    }

    /// Log root for `repo`, if logging is enabled
    pub fn repo_log_dir(&self, repo: &str) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| dir.join(repo))
    }

    /// Database source over this configuration's aports tree
    pub fn aports_source(&self) -> AportsSource {
        AportsSource {
            aports_dir: self.aports_dir.clone(),
            repo_dest: self.repo_dest.clone(),
            arch: self.arch.clone(),
            dependency_repos: self.dependency_repos.clone(),
        }
    }
}

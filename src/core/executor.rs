//! Recipe build execution
//!
//! [`RecipeBuilder`] is the seam between the orchestrator and the build
//! tool. [`AbuildExecutor`] runs the real tool; [`DryRunExecutor`] reports
//! success without touching anything.

use std::path::Path;

use crate::config::defaults::{BUILD_TOOL_ARGS, DEFAULT_BUILD_TOOL, REPODEST_ENV};
use crate::core::recipe::Recipe;
use crate::core::skip;
use crate::infra::process::{exit_code, ProcessInvocation};

/// Result of one build attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The build tool succeeded
    Built,
    /// Skipped because the previous attempt failed
    Skipped,
    /// The build could not run or the tool exited non-zero
    Failed {
        /// Exit status to propagate
        code: i32,
    },
}

/// Builds a single recipe
pub trait RecipeBuilder {
    /// Build `recipe`, publishing into `repo_dest`
    ///
    /// Output goes to `log` when set. With `skip_failed`, a recipe whose
    /// previous attempt failed is not built.
    fn build(
        &mut self,
        recipe: &Recipe,
        repo_dest: &Path,
        log: Option<&Path>,
        skip_failed: bool,
    ) -> BuildOutcome;
}

/// Runs the external build tool in the recipe directory
#[derive(Debug, Clone)]
pub struct AbuildExecutor {
    program: String,
}

impl AbuildExecutor {
    /// Executor running `program` (normally `abuild`)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The invocation used to build `recipe`
    pub fn invocation(
        &self,
        recipe: &Recipe,
        repo_dest: &Path,
        log: Option<&Path>,
    ) -> ProcessInvocation {
        ProcessInvocation::new(&self.program)
            .args(BUILD_TOOL_ARGS.iter().copied())
            .env(REPODEST_ENV, repo_dest.display().to_string())
            .current_dir(&recipe.dir)
            .redirect_to(log)
    }
}

impl Default for AbuildExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_TOOL)
    }
}

impl RecipeBuilder for AbuildExecutor {
    fn build(
        &mut self,
        recipe: &Recipe,
        repo_dest: &Path,
        log: Option<&Path>,
        skip_failed: bool,
    ) -> BuildOutcome {
        if !recipe.dir.is_dir() {
            tracing::error!("{}: cannot enter {}", recipe.name, recipe.dir.display());
            return BuildOutcome::Failed { code: 1 };
        }

        if skip_failed && skip::should_skip(recipe) {
            return BuildOutcome::Skipped;
        }

        if let Some(path) = log {
            tracing::info!("{}: logging to {}", recipe.name, path.display());
        }

        match self.invocation(recipe, repo_dest, log).status() {
            Ok(status) if status.success() => BuildOutcome::Built,
            Ok(status) => {
                let code = exit_code(status);
                tracing::error!("{}: failed to build (exit status {code})", recipe.name);
                BuildOutcome::Failed { code }
            }
            Err(e) => {
                tracing::error!("{}: {e}", recipe.name);
                BuildOutcome::Failed { code: 1 }
            }
        }
    }
}

/// Build stand-in for dry runs: always succeeds, never touches anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl RecipeBuilder for DryRunExecutor {
    fn build(
        &mut self,
        recipe: &Recipe,
        _repo_dest: &Path,
        _log: Option<&Path>,
        _skip_failed: bool,
    ) -> BuildOutcome {
        tracing::debug!("{}: dry run, not building", recipe.name);
        BuildOutcome::Built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn recipe_in(dir: &Path) -> Recipe {
        let content = "pkgname=hello\npkgver=2.12\npkgrel=1\narch=all\n";
        std::fs::write(dir.join("APKBUILD"), content).unwrap();
        Recipe::parse(dir, content, "x86_64").unwrap()
    }

    #[cfg(unix)]
    fn fake_tool(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-abuild");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_invocation_is_structured() {
        let recipe = Recipe::parse(
            Path::new("/aports/main/hello"),
            "pkgname=hello\npkgver=2.12\npkgrel=1\narch=all\n",
            "x86_64",
        )
        .unwrap();
        let log = PathBuf::from("/logs/main/hello/hello-2.12-r1.log");

        let inv = AbuildExecutor::default().invocation(
            &recipe,
            Path::new("/home/b/packages"),
            Some(&log),
        );

        assert_eq!(inv.program, "abuild");
        assert_eq!(inv.args, vec!["-r", "-m"]);
        assert_eq!(inv.env["REPODEST"], "/home/b/packages");
        assert_eq!(inv.current_dir, Some(PathBuf::from("/aports/main/hello")));
        assert_eq!(inv.output, Some(log));
    }

    #[test]
    fn test_missing_recipe_dir_fails_without_spawning() {
        let temp = TempDir::new().unwrap();
        let mut recipe = recipe_in(temp.path());
        recipe.dir = temp.path().join("gone");

        let outcome = AbuildExecutor::new("buildrepo-no-such-program-xyz").build(
            &recipe,
            temp.path(),
            None,
            false,
        );

        assert_eq!(outcome, BuildOutcome::Failed { code: 1 });
    }

    #[cfg(unix)]
    #[test]
    fn test_success_and_log_redirect() {
        let temp = TempDir::new().unwrap();
        let recipe = recipe_in(temp.path());
        let tool = fake_tool(temp.path(), "echo \"building in $REPODEST\"");
        let log = temp.path().join("build.log");

        let outcome = AbuildExecutor::new(tool.display().to_string()).build(
            &recipe,
            Path::new("/dest"),
            Some(&log),
            false,
        );

        assert_eq!(outcome, BuildOutcome::Built);
        assert!(std::fs::read_to_string(&log)
            .unwrap()
            .contains("building in /dest"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let recipe = recipe_in(temp.path());
        let tool = fake_tool(temp.path(), "exit 7");

        let outcome =
            AbuildExecutor::new(tool.display().to_string()).build(&recipe, temp.path(), None, false);

        assert_eq!(outcome, BuildOutcome::Failed { code: 7 });
    }

    #[cfg(unix)]
    #[test]
    fn test_skip_failed_short_circuits() {
        use std::fs::File;
        use std::time::{Duration, SystemTime};

        let temp = TempDir::new().unwrap();
        let recipe = recipe_in(temp.path());
        std::fs::create_dir(recipe.staging_dir()).unwrap();
        File::options()
            .write(true)
            .open(recipe.recipe_file())
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(600))
            .unwrap();
        let marker = temp.path().join("ran");
        let tool = fake_tool(temp.path(), &format!("touch {}", marker.display()));
        let mut executor = AbuildExecutor::new(tool.display().to_string());

        assert_eq!(
            executor.build(&recipe, temp.path(), None, true),
            BuildOutcome::Skipped
        );
        assert!(!marker.exists());

        assert_eq!(
            executor.build(&recipe, temp.path(), None, false),
            BuildOutcome::Built
        );
        assert!(marker.exists());
    }

    #[test]
    fn test_dry_run_has_no_side_effects() {
        let temp = TempDir::new().unwrap();
        let mut recipe = recipe_in(temp.path());
        recipe.dir = temp.path().join("does-not-exist");
        let log = temp.path().join("logs").join("x.log");

        let outcome = DryRunExecutor.build(&recipe, temp.path(), Some(&log), true);

        assert_eq!(outcome, BuildOutcome::Built);
        assert!(!log.exists());
        assert!(!temp.path().join("logs").exists());
    }
}

//! Build orchestration
//!
//! Drives one pass over each requested repository: select the recipes that
//! need building, build them in dependency order under the keep-going and
//! skip policies, purge obsolete artifacts, republish the index, and record
//! statistics.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::core::config::BuildConfig;
use crate::core::database::{DatabaseSource, PackageDatabase};
use crate::core::executor::{BuildOutcome, RecipeBuilder};
use crate::core::index::IndexPublisher;
use crate::core::stats::{RepoRunStats, StatsCollector};
use crate::core::{log_path, purge};
use crate::error::OrchestratorError;
use crate::infra::filesystem;

/// Sequential multi-repository build driver
pub struct Orchestrator<'a, S> {
    config: &'a BuildConfig,
    source: S,
    builder: Box<dyn RecipeBuilder + 'a>,
    publisher: Box<dyn IndexPublisher + 'a>,
}

impl<'a, S: DatabaseSource> Orchestrator<'a, S> {
    /// Create an orchestrator over `source` using the given collaborators
    pub fn new(
        config: &'a BuildConfig,
        source: S,
        builder: Box<dyn RecipeBuilder + 'a>,
        publisher: Box<dyn IndexPublisher + 'a>,
    ) -> Self {
        Self {
            config,
            source,
            builder,
            publisher,
        }
    }

    /// Process every configured repository in order
    ///
    /// Stops at the first error; with keep-going disabled a failed build is
    /// such an error and later repositories are never opened.
    pub fn run(&mut self) -> Result<StatsCollector, OrchestratorError> {
        let config = self.config;
        let mut collector = StatsCollector::new();

        for repo in &config.repos {
            let stats = self.build_repo(repo)?;
            collector.record(stats);
        }

        Ok(collector)
    }

    /// One full pass over `repo`
    pub fn build_repo(&mut self, repo: &str) -> Result<RepoRunStats, OrchestratorError> {
        let started = Instant::now();
        let config = self.config;

        let db = self
            .source
            .open(repo)
            .map_err(|source| OrchestratorError::Database {
                repo: repo.to_string(),
                source,
            })?;

        let total = db.enabled_recipes().count();

        let mut providers: HashMap<String, String> = HashMap::new();
        let mut build_set: Vec<String> = Vec::new();
        for recipe in db.recipes_needing_build() {
            if build_set.contains(&recipe.name) {
                tracing::warn!(
                    "{repo}: {} in {} duplicates an earlier recipe, not building it",
                    recipe.name,
                    recipe.dir.display()
                );
                continue;
            }
            for name in recipe.provides() {
                if let Some(other) = providers.insert(name.to_string(), recipe.name.clone()) {
                    tracing::warn!(
                        "{repo}: '{name}' is provided by both {other} and {}",
                        recipe.name
                    );
                }
            }
            build_set.push(recipe.name.clone());
        }

        let log_root = if config.dry_run {
            None
        } else {
            config.repo_log_dir(repo)
        };
        if let Some(dir) = &log_root {
            filesystem::create_dir_all(dir)?;
        }

        let ordered = db
            .recipes_in_build_order(&build_set)
            .map_err(|source| OrchestratorError::Database {
                repo: repo.to_string(),
                source,
            })?;

        let to_build = ordered.len();
        tracing::info!("{repo}: {to_build} of {total} recipes need building");

        let mut attempted = 0;
        let mut built = 0;
        let mut built_names: HashSet<String> = HashSet::new();
        for recipe in ordered {
            attempted += 1;
            println!(
                "{attempted}/{to_build} {}/{total} {}",
                (total + built).saturating_sub(to_build),
                recipe.name
            );

            if !db.dependencies_satisfied(recipe, &built_names) {
                tracing::warn!("{}: missing dependencies, not building", recipe.name);
                continue;
            }

            // A log directory that cannot be created fails this recipe only
            let outcome = match log_path::resolve(log_root.as_deref(), recipe) {
                Ok(log) => self.builder.build(
                    recipe,
                    &config.repo_dest,
                    log.as_deref(),
                    config.skip_failed,
                ),
                Err(e) => {
                    tracing::error!("{}: {e}", recipe.name);
                    BuildOutcome::Failed { code: 1 }
                }
            };

            match outcome {
                BuildOutcome::Built => {
                    built += 1;
                    built_names.extend(recipe.provides().map(str::to_string));
                }
                BuildOutcome::Skipped => {}
                BuildOutcome::Failed { code } => {
                    if !config.keep_going {
                        return Err(OrchestratorError::BuildFailed {
                            repo: repo.to_string(),
                            recipe: recipe.name.clone(),
                            code,
                        });
                    }
                    tracing::info!("{}: failed, keep going", recipe.name);
                }
            }
        }

        let output_dir = config.output_dir(repo);

        let mut deleted = 0;
        if config.purge {
            let retain = purge::retain_set(db.catalogue().map(|(_, artifact)| artifact));
            deleted = purge::reconcile(&retain, &output_dir, config.dry_run)?
                .deleted
                .len();
        }

        if !config.dry_run {
            self.publisher
                .update_index(&output_dir, &config.arch, &db.revision_descriptor())?;
        }

        Ok(RepoRunStats {
            repo: repo.to_string(),
            total,
            attempted,
            built,
            deleted,
            elapsed: started.elapsed(),
        })
    }
}

//! Package database
//!
//! [`PackageDatabase`] is the orchestrator's view of one repository: which
//! recipes exist, which need building, in what order, and whether their
//! dependencies are on disk. [`AportsDatabase`] implements it over an aports
//! checkout laid out as `<aports>/<repo>/<recipe>/APKBUILD`, with artifacts in
//! `<repodest>/<repo>/<arch>/`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::defaults::RECIPE_FILE;
use crate::core::recipe::Recipe;
use crate::core::resolver::DependencyGraph;
use crate::error::DatabaseError;
use crate::infra::{filesystem, git};

/// Per-repository recipe catalogue and dependency oracle
pub trait PackageDatabase {
    /// Every recipe enabled for the target architecture
    fn enabled_recipes(&self) -> impl Iterator<Item = &Recipe> + '_;

    /// Enabled recipes whose artifact is missing
    fn recipes_needing_build(&self) -> impl Iterator<Item = &Recipe> + '_;

    /// The named recipes, dependencies first
    fn recipes_in_build_order(&self, names: &[String]) -> Result<Vec<&Recipe>, DatabaseError>;

    /// Whether every dependency of `recipe` is available right now
    ///
    /// `built` holds the package names produced earlier in the same pass;
    /// they count as available even when nothing was written (dry run).
    fn dependencies_satisfied(&self, recipe: &Recipe, built: &HashSet<String>) -> bool;

    /// Every (recipe, artifact file name) pair of the repository
    fn catalogue(&self) -> impl Iterator<Item = (&Recipe, String)> + '_;

    /// Description recorded in the repository index
    fn revision_descriptor(&self) -> String;
}

/// Opens a [`PackageDatabase`] session per repository
pub trait DatabaseSource {
    /// Session type
    type Database: PackageDatabase;

    /// Open the database for `repo`
    fn open(&self, repo: &str) -> Result<Self::Database, DatabaseError>;
}

/// Location of an aports checkout and its package destination
#[derive(Debug, Clone)]
pub struct AportsSource {
    /// aports base directory
    pub aports_dir: PathBuf,
    /// Destination repository base directory
    pub repo_dest: PathBuf,
    /// Target architecture
    pub arch: String,
    /// Repositories whose built artifacts satisfy dependencies
    pub dependency_repos: Vec<String>,
}

impl DatabaseSource for AportsSource {
    type Database = AportsDatabase;

    fn open(&self, repo: &str) -> Result<AportsDatabase, DatabaseError> {
        AportsDatabase::open(self, repo)
    }
}

/// [`PackageDatabase`] backed by `APKBUILD` files
#[derive(Debug)]
pub struct AportsDatabase {
    repo: String,
    aports_dir: PathBuf,
    output_dir: PathBuf,
    /// All parsed recipes, in directory order
    recipes: Vec<Recipe>,
    /// Recipe name -> index into `recipes`
    by_name: HashMap<String, usize>,
    /// Provided package name -> index of the enabled recipe providing it
    providers: HashMap<String, usize>,
    /// Package name -> artifact path in a dependency repository
    external: HashMap<String, PathBuf>,
    graph: DependencyGraph,
}

impl AportsDatabase {
    /// Scan `<aports>/<repo>` and index the artifacts of dependency repositories
    pub fn open(source: &AportsSource, repo: &str) -> Result<Self, DatabaseError> {
        let repo_dir = source.aports_dir.join(repo);
        if !repo_dir.is_dir() {
            return Err(DatabaseError::RepositoryNotFound {
                repo: repo.to_string(),
                path: repo_dir,
            });
        }

        let recipes = load_recipes(&repo_dir, &source.arch)?;
        tracing::info!("Loaded {} recipes from {}", recipes.len(), repo_dir.display());

        let mut by_name = HashMap::new();
        let mut providers = HashMap::new();
        for (idx, recipe) in recipes.iter().enumerate() {
            by_name.entry(recipe.name.clone()).or_insert(idx);
            if recipe.arch_enabled {
                for name in recipe.provides() {
                    providers.entry(name.to_string()).or_insert(idx);
                }
            }
        }

        let mut external = HashMap::new();
        for dep_repo in source.dependency_repos.iter().filter(|r| *r != repo) {
            let dir = source.aports_dir.join(dep_repo);
            if !dir.is_dir() {
                tracing::warn!("Dependency repository '{dep_repo}' not found at {}", dir.display());
                continue;
            }
            let dep_output = source.repo_dest.join(dep_repo).join(&source.arch);
            for recipe in load_recipes(&dir, &source.arch)? {
                if !recipe.arch_enabled {
                    continue;
                }
                for name in recipe.provides() {
                    external
                        .entry(name.to_string())
                        .or_insert_with(|| dep_output.join(recipe.artifact_for(name)));
                }
            }
        }

        let mut graph = DependencyGraph::new();
        for (idx, recipe) in recipes.iter().enumerate() {
            // Only the first recipe with a given name is ever built
            if !recipe.arch_enabled || by_name.get(&recipe.name) != Some(&idx) {
                continue;
            }
            let mut deps: Vec<String> = recipe
                .depends
                .iter()
                .filter_map(|dep| providers.get(dep))
                .map(|&idx| recipes[idx].name.clone())
                .filter(|name| *name != recipe.name)
                .collect();
            deps.sort();
            deps.dedup();
            graph.add_recipe(&recipe.name, deps);
        }

        Ok(Self {
            repo: repo.to_string(),
            aports_dir: source.aports_dir.clone(),
            output_dir: source.repo_dest.join(repo).join(&source.arch),
            recipes,
            by_name,
            providers,
            external,
            graph,
        })
    }

    fn is_available(&self, recipe: &Recipe, dep: &str, built: &HashSet<String>) -> bool {
        if built.contains(dep) {
            return true;
        }

        if let Some(&idx) = self.providers.get(dep) {
            let provider = &self.recipes[idx];
            if provider.name == recipe.name {
                return true;
            }
            return self.output_dir.join(provider.artifact_for(dep)).exists();
        }

        if let Some(path) = self.external.get(dep) {
            return path.exists();
        }

        tracing::debug!("{}: assuming '{dep}' is provided by the system", recipe.name);
        true
    }
}

impl PackageDatabase for AportsDatabase {
    fn enabled_recipes(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.recipes.iter().filter(|r| r.arch_enabled)
    }

    fn recipes_needing_build(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.enabled_recipes()
            .filter(|r| !self.output_dir.join(r.artifact_file_name()).exists())
    }

    fn recipes_in_build_order(&self, names: &[String]) -> Result<Vec<&Recipe>, DatabaseError> {
        let order = self.graph.order(names)?;
        Ok(order
            .iter()
            .filter_map(|name| self.by_name.get(name))
            .map(|&idx| &self.recipes[idx])
            .collect())
    }

    fn dependencies_satisfied(&self, recipe: &Recipe, built: &HashSet<String>) -> bool {
        let missing: Vec<&str> = recipe
            .depends
            .iter()
            .map(String::as_str)
            .filter(|dep| !self.is_available(recipe, dep, built))
            .collect();

        if missing.is_empty() {
            true
        } else {
            tracing::info!("{}: missing {}", recipe.name, missing.join(", "));
            false
        }
    }

    fn catalogue(&self) -> impl Iterator<Item = (&Recipe, String)> + '_ {
        self.recipes
            .iter()
            .flat_map(|recipe| recipe.artifact_names().map(move |name| (recipe, name)))
    }

    fn revision_descriptor(&self) -> String {
        let revision = git::head_short_sha(&self.aports_dir).unwrap_or_else(|e| {
            tracing::debug!("No git revision for {}: {e}", self.aports_dir.display());
            "unknown".to_string()
        });
        format!("{} {revision}", self.repo)
    }
}

/// Parse every `<dir>/*/APKBUILD`; unparsable recipes are skipped with a warning
fn load_recipes(repo_dir: &Path, arch: &str) -> Result<Vec<Recipe>, DatabaseError> {
    let mut recipes = Vec::new();
    for dir in filesystem::list_subdirs(repo_dir)? {
        if !dir.join(RECIPE_FILE).is_file() {
            continue;
        }
        match Recipe::load(&dir, arch) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => tracing::warn!("Skipping {}: {e}", dir.display()),
        }
    }
    Ok(recipes)
}

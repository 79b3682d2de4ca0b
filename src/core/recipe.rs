//! Recipe (APKBUILD) handling
//!
//! An `APKBUILD` is a shell script, but the metadata buildrepo needs lives in
//! top-level variable assignments. This module extracts those assignments
//! without running a shell and turns them into a [`Recipe`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::config::defaults::{ARTIFACT_SUFFIX, RECIPE_FILE, STAGING_DIR};
use crate::error::RecipeError;
use crate::infra::filesystem;

/// A buildable package definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Package name (`pkgname`)
    pub name: String,
    /// Upstream version (`pkgver`)
    pub version: String,
    /// Release ordinal (`pkgrel`)
    pub release: u32,
    /// Directory holding the `APKBUILD`; the build runs here
    pub dir: PathBuf,
    /// Declared architectures (`arch`)
    pub arch: Vec<String>,
    /// Build and runtime dependency names, version constraints stripped
    pub depends: Vec<String>,
    /// Subpackage names (`subpackages`)
    pub subpackages: Vec<String>,
    /// Whether the recipe builds for the configured target architecture
    pub arch_enabled: bool,
}

impl Recipe {
    /// Load `<dir>/APKBUILD`
    pub fn load(dir: &Path, target_arch: &str) -> Result<Self, RecipeError> {
        let content = filesystem::read_file(&dir.join(RECIPE_FILE))?;
        Self::parse(dir, &content, target_arch)
    }

    /// Build a recipe from `APKBUILD` content
    pub fn parse(dir: &Path, content: &str, target_arch: &str) -> Result<Self, RecipeError> {
        let vars = parse_assignments(content);
        let recipe_path = dir.join(RECIPE_FILE);

        let required = |field: &str| -> Result<String, RecipeError> {
            vars.get(field)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| RecipeError::MissingField {
                    path: recipe_path.clone(),
                    field: field.to_string(),
                })
        };

        let name = required("pkgname")?;
        let version = required("pkgver")?;
        let release_raw = required("pkgrel")?;
        let release = release_raw
            .parse::<u32>()
            .map_err(|_| RecipeError::InvalidRelease {
                path: recipe_path.clone(),
                value: release_raw.clone(),
            })?;

        let words = |field: &str| -> Vec<String> {
            vars.get(field)
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };

        let arch = words("arch");
        let depends = ["depends", "makedepends", "checkdepends"]
            .into_iter()
            .flat_map(|field| words(field))
            .filter_map(|dep| dependency_name(&dep))
            .collect();
        let subpackages = words("subpackages")
            .into_iter()
            .filter_map(|sub| sub.split(':').next().map(str::to_string))
            .filter(|sub| !sub.is_empty())
            .collect();

        let arch_enabled = is_arch_enabled(&arch, target_arch);

        Ok(Self {
            name,
            version,
            release,
            dir: dir.to_path_buf(),
            arch,
            depends,
            subpackages,
            arch_enabled,
        })
    }

    /// Path to the recipe definition file
    pub fn recipe_file(&self) -> PathBuf {
        self.dir.join(RECIPE_FILE)
    }

    /// Path to the staging directory a build extracts sources into
    pub fn staging_dir(&self) -> PathBuf {
        self.dir.join(STAGING_DIR)
    }

    /// `version-rRELEASE`
    pub fn full_version(&self) -> String {
        format!("{}-r{}", self.version, self.release)
    }

    /// File name of the main packaged artifact
    pub fn artifact_file_name(&self) -> String {
        artifact_file_name(&self.name, &self.full_version())
    }

    /// Artifact file name of one of the packages this recipe provides
    pub fn artifact_for(&self, provided: &str) -> String {
        artifact_file_name(provided, &self.full_version())
    }

    /// Every artifact this recipe produces: the main package and each subpackage
    pub fn artifact_names(&self) -> impl Iterator<Item = String> + '_ {
        let full_version = self.full_version();
        self.provides()
            .map(move |name| artifact_file_name(name, &full_version))
    }

    /// Package names this recipe provides
    pub fn provides(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.subpackages.iter().map(String::as_str))
    }
}

fn artifact_file_name(name: &str, full_version: &str) -> String {
    format!("{name}-{full_version}{ARTIFACT_SUFFIX}")
}

/// Whether a recipe declaring `arch` builds for `target`
///
/// `all` and `noarch` enable every architecture; `!target` always wins.
pub fn is_arch_enabled(arch: &[String], target: &str) -> bool {
    let negated = format!("!{target}");
    if arch.iter().any(|a| *a == negated) {
        return false;
    }
    arch.iter()
        .any(|a| a == "all" || a == "noarch" || a == target)
}

/// Strip version constraints from a dependency; conflicts (`!name`) yield `None`
fn dependency_name(dep: &str) -> Option<String> {
    if dep.starts_with('!') {
        return None;
    }
    let end = dep.find(['<', '>', '=', '~']).unwrap_or(dep.len());
    let name = &dep[..end];
    (!name.is_empty()).then(|| name.to_string())
}

fn assignment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("valid regex"))
}

fn variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
            .expect("valid regex")
    })
}

/// Collect top-level `name=value` assignments
///
/// Only unindented assignments are read, so locals inside functions are
/// ignored. Quoted values may span lines. `$var` and `${var}` expand against
/// earlier assignments; unknown variables expand to nothing.
pub fn parse_assignments(content: &str) -> HashMap<String, String> {
    let mut vars: HashMap<String, String> = HashMap::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(caps) = assignment_regex().captures(line) else {
            continue;
        };
        let key = caps[1].to_string();
        let rest = caps[2].trim_end();

        let raw = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let mut value = rest[1..].to_string();
                while !value.contains(quote) {
                    match lines.next() {
                        Some(next) => {
                            value.push('\n');
                            value.push_str(next);
                        }
                        None => break,
                    }
                }
                match value.find(quote) {
                    Some(end) => value[..end].to_string(),
                    None => value,
                }
            }
            _ => rest
                .split(|c: char| c.is_whitespace() || c == '#' || c == ';')
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        let expanded = if rest.starts_with('\'') {
            raw
        } else {
            expand(&raw, &vars)
        };
        vars.insert(key, expanded);
    }

    vars
}

fn expand(value: &str, vars: &HashMap<String, String>) -> String {
    variable_regex()
        .replace_all(value, |caps: &Captures<'_>| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            vars.get(name).cloned().unwrap_or_default()
        })
        .into_owned()
}

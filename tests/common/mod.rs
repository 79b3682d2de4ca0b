//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a temporary
//! aports tree with a destination repository, and fake build, index and
//! signing tools for driving the binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Architecture used throughout the tests
pub const ARCH: &str = "x86_64";

/// Fake build tool
///
/// Sources the APKBUILD, fails with status 3 when a `FAIL` marker sits next
/// to it, otherwise writes one artifact per provided package into
/// `$REPODEST/<repo>/$CARCH`.
pub const FAKE_ABUILD: &str = r#"#!/bin/sh
. ./APKBUILD
echo "building $pkgname"
if [ -e FAIL ]; then
    echo "build of $pkgname failed" >&2
    exit 3
fi
repo=$(basename "$(dirname "$PWD")")
out="$REPODEST/$repo/$CARCH"
mkdir -p "$out"
for p in $pkgname $subpackages; do
    p=${p%%:*}
    echo apk > "$out/$p-$pkgver-r$pkgrel.apk"
done
echo "$pkgname" >> "$REPODEST/built.txt"
"#;

/// Fake `apk`: writes the file named by `--output`
pub const FAKE_APK: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
    if [ "$1" = --output ]; then echo index > "$2"; fi
    shift
done
"#;

/// Fake `abuild-sign`
pub const FAKE_SIGN: &str = "#!/bin/sh\nexit 0\n";

/// Test aports tree context
///
/// Lays out `aports/<repo>/<recipe>/APKBUILD`, `packages/<repo>/<arch>/`
/// and a `bin/` directory of fake tools inside one temporary directory.
pub struct TestProject {
    /// Temporary directory for the test tree
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test tree in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test tree
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// aports base directory
    pub fn aports(&self) -> PathBuf {
        self.dir.path().join("aports")
    }

    /// Destination repository base directory
    pub fn repodest(&self) -> PathBuf {
        self.dir.path().join("packages")
    }

    /// Artifact directory of `repo`
    pub fn output_dir(&self, repo: &str) -> PathBuf {
        self.repodest().join(repo).join(ARCH)
    }

    /// Log root
    pub fn logdir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// Fake tool directory
    pub fn bin(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    /// Write a recipe at version 1.0-r0 with the given build dependencies
    pub fn add_recipe(&self, repo: &str, name: &str, deps: &str) -> PathBuf {
        self.add_recipe_with(repo, name, deps, "")
    }

    /// Write a recipe with extra APKBUILD lines
    pub fn add_recipe_with(&self, repo: &str, name: &str, deps: &str, extra: &str) -> PathBuf {
        let dir = self.aports().join(repo).join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create recipe directory");
        std::fs::write(
            dir.join("APKBUILD"),
            format!(
                "pkgname={name}\npkgver=1.0\npkgrel=0\narch=\"all\"\nmakedepends=\"{deps}\"\n{extra}"
            ),
        )
        .expect("Failed to write APKBUILD");
        dir
    }

    /// Make the fake build tool fail for `name` in `repo`
    pub fn mark_failing(&self, repo: &str, name: &str) {
        let path = self.aports().join(repo).join(name).join("FAIL");
        std::fs::write(path, "").expect("Failed to write FAIL marker");
    }

    /// Place an artifact in the output directory of `repo`
    pub fn add_artifact(&self, repo: &str, file: &str) {
        let dir = self.output_dir(repo);
        std::fs::create_dir_all(&dir).expect("Failed to create output directory");
        std::fs::write(dir.join(file), "apk").expect("Failed to write artifact");
    }

    /// Whether `file` exists in the output directory of `repo`
    pub fn artifact_exists(&self, repo: &str, file: &str) -> bool {
        self.output_dir(repo).join(file).exists()
    }

    /// Recipes the fake build tool built, in order
    pub fn built(&self) -> Vec<String> {
        std::fs::read_to_string(self.repodest().join("built.txt"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Install the fake build, index and signing tools
    #[cfg(unix)]
    pub fn install_tools(&self) {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.bin();
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");
        for (name, script) in [
            ("abuild", FAKE_ABUILD),
            ("apk", FAKE_APK),
            ("abuild-sign", FAKE_SIGN),
        ] {
            let path = bin.join(name);
            std::fs::write(&path, script).expect("Failed to write fake tool");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to make fake tool executable");
        }
    }

    /// Command running the buildrepo binary against this tree
    ///
    /// The fake tools come first on `PATH` and the user's config file is
    /// kept out of the way.
    pub fn command(&self) -> Command {
        let path = match std::env::var_os("PATH") {
            Some(existing) => {
                let mut dirs = vec![self.bin()];
                dirs.extend(std::env::split_paths(&existing));
                std::env::join_paths(dirs).expect("Failed to join PATH")
            }
            None => self.bin().into_os_string(),
        };

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildrepo"));
        cmd.env("PATH", path)
            .env("BUILDREPO_CONFIG_DIR", self.dir.path().join("config"))
            .env("CARCH", ARCH)
            .env("ABUILD", self.bin().join("abuild"))
            .env("APORTSDIR", self.aports())
            .env("REPODEST", self.repodest())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run the binary with `args`
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute buildrepo")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured stdout as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Captured stderr as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Whether `dir` contains no entries (or does not exist)
pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).map_or(true, |mut entries| entries.next().is_none())
}

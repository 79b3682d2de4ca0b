//! Repository index publishing
//!
//! After a build pass the repository's `APKINDEX.tar.gz` is regenerated
//! from the artifacts on disk and signed. A directory left without artifacts
//! loses its index.

use std::path::Path;

use crate::config::defaults::{ARTIFACT_SUFFIX, INDEX_FILE, INDEX_TOOL, SIGN_TOOL};
use crate::error::IndexError;
use crate::infra::filesystem;
use crate::infra::process::ProcessInvocation;

/// Regenerates a repository index
pub trait IndexPublisher {
    /// Rebuild the index of `output_dir` for `arch`, tagged with `description`
    fn update_index(
        &mut self,
        output_dir: &Path,
        arch: &str,
        description: &str,
    ) -> Result<(), IndexError>;
}

/// Publishes with `apk index` and `abuild-sign`
#[derive(Debug, Clone)]
pub struct ApkIndexPublisher {
    index_tool: String,
    sign_tool: String,
}

impl ApkIndexPublisher {
    /// Publisher using the given index and signing programs
    pub fn new(index_tool: impl Into<String>, sign_tool: impl Into<String>) -> Self {
        Self {
            index_tool: index_tool.into(),
            sign_tool: sign_tool.into(),
        }
    }

    /// The index and sign invocations for `artifacts` in `output_dir`
    pub fn invocations(
        &self,
        output_dir: &Path,
        arch: &str,
        description: &str,
        artifacts: &[String],
    ) -> Vec<ProcessInvocation> {
        let unsigned = unsigned_name();

        let mut index = ProcessInvocation::new(&self.index_tool)
            .args(["index", "--quiet", "--output", unsigned.as_str()])
            .args(["--description", description])
            .args(["--rewrite-arch", arch])
            .current_dir(output_dir);
        if output_dir.join(INDEX_FILE).exists() {
            index = index.args(["--index", INDEX_FILE]);
        }
        let index = index.args(artifacts.iter().cloned());

        let sign = ProcessInvocation::new(&self.sign_tool)
            .args(["-q", unsigned.as_str()])
            .current_dir(output_dir);

        vec![index, sign]
    }
}

impl Default for ApkIndexPublisher {
    fn default() -> Self {
        Self::new(INDEX_TOOL, SIGN_TOOL)
    }
}

impl IndexPublisher for ApkIndexPublisher {
    fn update_index(
        &mut self,
        output_dir: &Path,
        arch: &str,
        description: &str,
    ) -> Result<(), IndexError> {
        let mut artifacts: Vec<String> = filesystem::list_files(output_dir)?
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter(|n| n.ends_with(ARTIFACT_SUFFIX))
            .map(str::to_string)
            .collect();

        if artifacts.is_empty() {
            // An index listing purged artifacts must not outlive them
            let index = output_dir.join(INDEX_FILE);
            if index.exists() {
                tracing::info!("No artifacts left, removing {}", index.display());
                filesystem::remove_file(&index)?;
            } else {
                tracing::info!("No artifacts in {}, not indexing", output_dir.display());
            }
            return Ok(());
        }
        artifacts.sort();

        tracing::info!("Updating index of {} ({description})", output_dir.display());
        for invocation in self.invocations(output_dir, arch, description, &artifacts) {
            invocation.run().map_err(|source| IndexError::Process {
                path: output_dir.to_path_buf(),
                source,
            })?;
        }

        filesystem::rename(
            &output_dir.join(unsigned_name()),
            &output_dir.join(INDEX_FILE),
        )?;
        Ok(())
    }
}

fn unsigned_name() -> String {
    format!("{INDEX_FILE}.unsigned")
}

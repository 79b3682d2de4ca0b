//! External process invocation
//!
//! A [`ProcessInvocation`] describes a child process as data (program,
//! arguments, environment, working directory and an optional log file for
//! combined output) instead of a shell command line.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::ProcessError;

/// Structured description of an external process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    /// Program to execute (looked up on `PATH` when not absolute)
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Extra environment variables layered over the inherited environment
    pub env: BTreeMap<String, String>,
    /// Working directory for the child
    pub current_dir: Option<PathBuf>,
    /// File receiving both stdout and stderr (truncated first)
    pub output: Option<PathBuf>,
}

impl ProcessInvocation {
    /// Create an invocation of `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            current_dir: None,
            output: None,
        }
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Run the child in `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Redirect combined output to `path`, or keep the parent's streams on `None`
    #[must_use]
    pub fn redirect_to(mut self, path: Option<&Path>) -> Self {
        self.output = path.map(Path::to_path_buf);
        self
    }

    /// Build the [`Command`], opening the log file if one is set
    fn command(&self) -> Result<Command, ProcessError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(&self.env);

        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        if let Some(path) = &self.output {
            let redirect_err = |e: std::io::Error| ProcessError::Redirect {
                path: path.clone(),
                error: e.to_string(),
            };
            let stdout = File::create(path).map_err(redirect_err)?;
            let stderr = stdout.try_clone().map_err(redirect_err)?;
            cmd.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
        }

        Ok(cmd)
    }

    /// Spawn the child and block until it exits
    pub fn status(&self) -> Result<ExitStatus, ProcessError> {
        tracing::debug!("Running {} {}", self.program, self.args.join(" "));

        self.command()?
            .status()
            .map_err(|e| ProcessError::Spawn {
                program: self.program.clone(),
                error: e.to_string(),
            })
    }

    /// Run the child and fail on a non-zero exit status
    pub fn run(&self) -> Result<(), ProcessError> {
        let status = self.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                program: self.program.clone(),
                code: exit_code(status),
            })
        }
    }
}

/// Exit code of a finished process; termination by signal maps to 1
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_collects_fields() {
        let inv = ProcessInvocation::new("abuild")
            .args(["-r", "-m"])
            .env("REPODEST", "/home/build/packages")
            .current_dir("/aports/main/zlib");

        assert_eq!(inv.program, "abuild");
        assert_eq!(inv.args, vec!["-r", "-m"]);
        assert_eq!(
            inv.env.get("REPODEST").map(String::as_str),
            Some("/home/build/packages")
        );
        assert_eq!(inv.current_dir, Some(PathBuf::from("/aports/main/zlib")));
        assert!(inv.output.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_code() {
        let err = ProcessInvocation::new("sh")
            .args(["-c", "exit 3"])
            .run()
            .unwrap_err();

        match err {
            ProcessError::Failed { code, .. } => assert_eq!(code, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_redirect_captures_stdout_and_stderr() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("out.log");

        ProcessInvocation::new("sh")
            .args(["-c", "echo out; echo err >&2"])
            .redirect_to(Some(&log))
            .run()
            .unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.contains("out"));
        assert!(content.contains("err"));
    }

    #[cfg(unix)]
    #[test]
    fn test_env_and_current_dir_reach_child() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("env.log");

        ProcessInvocation::new("sh")
            .args(["-c", "echo \"$REPODEST\"; pwd"])
            .env("REPODEST", "/srv/packages")
            .current_dir(temp.path())
            .redirect_to(Some(&log))
            .run()
            .unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.contains("/srv/packages"));
        let dir_name = temp.path().file_name().unwrap().to_string_lossy();
        assert!(content.contains(dir_name.as_ref()));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = ProcessInvocation::new("buildrepo-no-such-program-xyz")
            .status()
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}

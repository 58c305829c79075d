// SPDX-License-Identifier: MIT OR Apache-2.0
//! Launching and supervising a second fixture instance.

use crate::{ENV_PREFIX, FixtureError};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Seconds the spawned instance sleeps for. Longer than any harness timeout,
/// so the child only ends when the harness kills it.
pub const SPAWN_SLEEP_SECS: u64 = 10_000;

/// What to launch in spawn mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Environment variables removed from the inherited environment.
    pub env_remove: Vec<OsString>,
}

impl SpawnSpec {
    /// Create a spec with the given program and no args.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env_remove: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Re-invoke the running executable with `--sleep 10000`.
    ///
    /// Every `TESTECHO_*` variable is stripped from the child's environment
    /// so it does not pick up the parent's configuration.
    pub fn current_exe() -> Result<Self, FixtureError> {
        let exe = std::env::current_exe().map_err(FixtureError::CurrentExe)?;
        let mut spec = Self::new(exe)
            .arg("--sleep")
            .arg(SPAWN_SLEEP_SECS.to_string());
        spec.env_remove = prefixed_env_vars();
        Ok(spec)
    }
}

fn prefixed_env_vars() -> Vec<OsString> {
    let prefix = format!("{ENV_PREFIX}_");
    std::env::vars_os()
        .map(|(key, _)| key)
        .filter(|key| key.to_str().is_some_and(|k| k.starts_with(&prefix)))
        .collect()
}

/// A started child together with the task waiting on it.
#[derive(Debug)]
pub struct Supervised {
    pid: u32,
    wait: JoinHandle<Result<ExitStatus, FixtureError>>,
}

impl Supervised {
    /// Start the child and hand it to a supervisory task.
    ///
    /// The child's stdio is attached to the null device. Must be called from
    /// within a tokio runtime.
    pub fn start(spec: &SpawnSpec) -> Result<Self, FixtureError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        for key in &spec.env_remove {
            cmd.env_remove(key);
        }

        let mut child = cmd.spawn().map_err(FixtureError::Spawn)?;
        let pid = child.id().ok_or_else(|| {
            FixtureError::Spawn(io::Error::other("spawned instance has no pid"))
        })?;
        debug!(
            target: "testecho.spawn",
            pid,
            program = %spec.program.display(),
            "spawned instance"
        );

        let wait = tokio::spawn(async move {
            let status = child.wait().await.map_err(FixtureError::Wait)?;
            // A signal from the harness is the normal way for the child to end.
            info!(target: "testecho.spawn", pid, %status, "spawned instance exited");
            Ok(status)
        });

        Ok(Self { pid, wait })
    }

    /// OS process identifier of the child.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Block until the child has terminated.
    pub async fn join(self) -> Result<ExitStatus, FixtureError> {
        self.wait.await.map_err(FixtureError::Supervisor)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_exe_sleeps_effectively_forever() {
        let spec = SpawnSpec::current_exe().unwrap();
        assert_eq!(spec.program, std::env::current_exe().unwrap());
        assert_eq!(spec.args, vec!["--sleep".to_string(), "10000".to_string()]);
    }

    #[test]
    fn builder_appends_args() {
        let spec = SpawnSpec::new("sleep").arg("1").arg("2");
        assert_eq!(spec.args, vec!["1", "2"]);
        assert!(spec.env_remove.is_empty());
    }

    #[tokio::test]
    async fn missing_program_fails_to_start() {
        let spec = SpawnSpec::new("/definitely/not/a/real/program");
        let err = Supervised::start(&spec).unwrap_err();
        assert!(matches!(err, FixtureError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn join_waits_for_child() {
        let spec = SpawnSpec::new("sleep").arg("0");
        let supervised = Supervised::start(&spec).unwrap();
        assert!(supervised.pid() > 0);
        let status = supervised.join().await.unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_child_is_not_an_error() {
        let spec = SpawnSpec::new("sh").arg("-c").arg("exit 3");
        let status = Supervised::start(&spec).unwrap().join().await.unwrap();
        assert_eq!(status.code(), Some(3));
    }
}

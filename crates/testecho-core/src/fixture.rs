// SPDX-License-Identifier: MIT OR Apache-2.0
//! The single execution path of a fixture run.

use crate::input::{self, InputSource};
use crate::output::{write_stderr, write_stdout};
use crate::{ExitController, FixtureConfig, FixtureError, SpawnSpec, Supervised};
use std::fmt;
use tokio::io::AsyncWrite;
use tracing::debug;

/// Steps of a run, in order. `SpawnBranch` and `EchoBranch` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Configuration is validated.
    Start,
    /// A child is started and its pid written to stdout.
    SpawnBranch,
    /// Piped stdin or the `stdout` literal is written to stdout.
    EchoBranch,
    /// The `stderr` literal is written.
    StderrWrite,
    /// The configured delay elapses.
    Delay,
    /// The supervised child is waited on.
    JoinSpawn,
    /// The configured exit status is handed back.
    Exit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::SpawnBranch => "spawn",
            Self::EchoBranch => "echo",
            Self::StderrWrite => "stderr",
            Self::Delay => "delay",
            Self::JoinSpawn => "join",
            Self::Exit => "exit",
        };
        f.write_str(s)
    }
}

/// One configured fixture run.
///
/// ```no_run
/// # async fn demo() -> Result<(), testecho_core::FixtureError> {
/// use testecho_core::{Fixture, FixtureConfig, ProcessStdin};
///
/// let config = FixtureConfig { stdout: "out".into(), exit_code: 7, ..Default::default() };
/// let code = Fixture::new(config)
///     .run(ProcessStdin, &mut tokio::io::stdout(), &mut tokio::io::stderr())
///     .await?;
/// std::process::exit(code);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Fixture {
    config: FixtureConfig,
    spawn_spec: Option<SpawnSpec>,
}

impl Fixture {
    /// Create a run that spawns the current executable in spawn mode.
    pub fn new(config: FixtureConfig) -> Self {
        Self {
            config,
            spawn_spec: None,
        }
    }

    /// Supervise `spec` instead of the current executable in spawn mode.
    pub fn with_spawn_spec(mut self, spec: SpawnSpec) -> Self {
        self.spawn_spec = Some(spec);
        self
    }

    /// The configuration this run is driven by.
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Perform the run and return the exit status to terminate with.
    ///
    /// Nothing is written if the configuration is invalid. Stdout output
    /// always precedes the stderr write. The caller owns process termination.
    pub async fn run<S, O, E>(
        &self,
        source: S,
        stdout: &mut O,
        stderr: &mut E,
    ) -> Result<i32, FixtureError>
    where
        S: InputSource,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        trace_phase(Phase::Start);
        self.config.validate()?;

        let supervised = if self.config.spawn {
            trace_phase(Phase::SpawnBranch);
            let spec = match &self.spawn_spec {
                Some(spec) => spec.clone(),
                None => SpawnSpec::current_exe()?,
            };
            let supervised = Supervised::start(&spec)?;
            write_stdout(stdout, supervised.pid().to_string().as_bytes()).await?;
            Some(supervised)
        } else {
            trace_phase(Phase::EchoBranch);
            let bytes = input::resolve_stdout(&self.config, source).await?;
            write_stdout(stdout, &bytes).await?;
            None
        };

        trace_phase(Phase::StderrWrite);
        write_stderr(stderr, self.config.stderr.as_bytes()).await?;

        ExitController::new(&self.config).finish(supervised).await
    }
}

pub(crate) fn trace_phase(phase: Phase) {
    debug!(target: "testecho.fixture", %phase, "entering phase");
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for fixture runs.
//!
//! Every failure is fatal. The variant decides the process exit status
//! through [`FixtureError::exit_code`].

use std::fmt;
use thiserror::Error;

/// Exit status for usage, conflict and environment failures.
pub const USAGE_EXIT_CODE: i32 = 1;

/// Exit status for failures while spawning, reading or writing.
pub const ABNORMAL_EXIT_CODE: i32 = 2;

/// Broad family that a [`FixtureError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unexpected positional arguments or an out-of-range flag.
    Usage,
    /// Piped stdin together with a non-empty `--stdout`.
    ConfigConflict,
    /// The running executable cannot be located.
    Environment,
    /// The spawned instance failed to start or to be waited on.
    Spawn,
    /// Inspecting or reading stdin failed.
    Input,
    /// Writing to stdout or stderr failed.
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Usage => "usage",
            Self::ConfigConflict => "config_conflict",
            Self::Environment => "environment",
            Self::Spawn => "spawn",
            Self::Input => "input",
            Self::Output => "output",
        };
        f.write_str(s)
    }
}

/// Errors that terminate a fixture run.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Positional arguments were passed.
    #[error("Received unexpected arguments, see --help")]
    UnexpectedArguments(Vec<String>),

    /// `--code` was negative.
    #[error("--code cannot be less than 0")]
    NegativeExitCode(i32),

    /// Stdin is piped and `--stdout` is also set.
    #[error("received both --stdout and stdin")]
    StdoutConflict,

    /// The path of the running executable is unavailable.
    #[error("failed to spawn another instance: {0}")]
    CurrentExe(#[source] std::io::Error),

    /// The spawned instance could not be started.
    #[error("failed to start spawned instance: {0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting on the spawned instance failed.
    #[error("failed to wait for spawned instance: {0}")]
    Wait(#[source] std::io::Error),

    /// The supervisory task panicked or was cancelled.
    #[error("spawn supervisor did not complete: {0}")]
    Supervisor(#[source] tokio::task::JoinError),

    /// Stdin could not be inspected.
    #[error("failed to inspect stdin: {0}")]
    StdinInspect(#[source] std::io::Error),

    /// Reading piped stdin failed mid-stream.
    #[error("failed to read stdin: {0}")]
    StdinRead(#[source] std::io::Error),

    /// Writing to stdout failed.
    #[error("failed to write stdout: {0}")]
    Stdout(#[source] std::io::Error),

    /// Writing to stderr failed.
    #[error("failed to write stderr: {0}")]
    Stderr(#[source] std::io::Error),
}

impl FixtureError {
    /// Family of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedArguments(_) | Self::NegativeExitCode(_) => ErrorKind::Usage,
            Self::StdoutConflict => ErrorKind::ConfigConflict,
            Self::CurrentExe(_) => ErrorKind::Environment,
            Self::Spawn(_) | Self::Wait(_) | Self::Supervisor(_) => ErrorKind::Spawn,
            Self::StdinInspect(_) | Self::StdinRead(_) => ErrorKind::Input,
            Self::Stdout(_) | Self::Stderr(_) => ErrorKind::Output,
        }
    }

    /// Process exit status this error terminates with.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Usage | ErrorKind::ConfigConflict | ErrorKind::Environment => {
                USAGE_EXIT_CODE
            }
            ErrorKind::Spawn | ErrorKind::Input | ErrorKind::Output => ABNORMAL_EXIT_CODE,
        }
    }
}

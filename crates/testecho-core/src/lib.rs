// SPDX-License-Identifier: MIT OR Apache-2.0
//! testecho-core
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! A deterministic child process for tests that supervise child processes.
//!
//! A [`Fixture`] run writes an exact byte sequence to stdout and stderr,
//! optionally launches and waits on a second instance of itself, sleeps for a
//! configured number of seconds and hands back the exit status to terminate
//! with. Every failure is fatal and maps onto a fixed exit status through
//! [`FixtureError::exit_code`].

pub mod config;
pub mod error;
pub mod exit;
pub mod fixture;
pub mod input;
pub mod output;
pub mod spawn;

pub use config::FixtureConfig;
pub use error::{ABNORMAL_EXIT_CODE, ErrorKind, FixtureError, USAGE_EXIT_CODE};
pub use exit::ExitController;
pub use fixture::{Fixture, Phase};
pub use input::{InputSource, ProcessStdin, StaticInput};
pub use spawn::{SPAWN_SLEEP_SECS, SpawnSpec, Supervised};

/// Prefix of the environment variables that mirror the command-line flags.
pub const ENV_PREFIX: &str = "TESTECHO";

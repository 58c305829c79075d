// SPDX-License-Identifier: MIT OR Apache-2.0
//! The immutable set of knobs a fixture run is driven by.

use crate::FixtureError;
use std::time::Duration;

/// Controllable parameters of one fixture run.
///
/// Built once by the argument binder and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Exit status on the success path. Must not be negative.
    pub exit_code: i32,
    /// Whole seconds to wait after writing, before exiting.
    pub sleep_seconds: u64,
    /// Launch and supervise a second instance instead of handling stdin.
    pub spawn: bool,
    /// Written verbatim to stderr.
    pub stderr: String,
    /// Written verbatim to stdout when neither spawning nor reading stdin.
    pub stdout: String,
}

impl FixtureConfig {
    /// Rejects a negative exit code.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.exit_code < 0 {
            return Err(FixtureError::NegativeExitCode(self.exit_code));
        }
        Ok(())
    }

    /// Delay applied before exit, if any.
    pub fn delay(&self) -> Option<Duration> {
        (self.sleep_seconds > 0).then(|| Duration::from_secs(self.sleep_seconds))
    }
}

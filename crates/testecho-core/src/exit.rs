// SPDX-License-Identifier: MIT OR Apache-2.0
//! Delay, join and the final exit status.

use crate::fixture::{Phase, trace_phase};
use crate::{FixtureConfig, FixtureError, Supervised};
use std::time::Duration;
use tracing::debug;

/// Applies the configured delay, waits for any supervised child and yields
/// the configured exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitController {
    delay: Option<Duration>,
    code: i32,
}

impl ExitController {
    /// Build from a validated configuration.
    pub fn new(config: &FixtureConfig) -> Self {
        Self {
            delay: config.delay(),
            code: config.exit_code,
        }
    }

    /// Run the tail of a fixture run and return the status to exit with.
    pub async fn finish(self, supervised: Option<Supervised>) -> Result<i32, FixtureError> {
        trace_phase(Phase::Delay);
        if let Some(delay) = self.delay {
            debug!(target: "testecho.exit", secs = delay.as_secs(), "sleeping before exit");
            tokio::time::sleep(delay).await;
        }
        if let Some(supervised) = supervised {
            trace_phase(Phase::JoinSpawn);
            debug!(
                target: "testecho.exit",
                pid = supervised.pid(),
                "waiting for spawned instance"
            );
            supervised.join().await?;
        }
        trace_phase(Phase::Exit);
        Ok(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_configured_seconds() {
        let config = FixtureConfig {
            exit_code: 4,
            sleep_seconds: 5,
            ..Default::default()
        };
        let start = Instant::now();
        let code = ExitController::new(&config).finish(None).await.unwrap();
        assert_eq!(code, 4);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_sleep_returns_immediately() {
        let start = Instant::now();
        let code = ExitController::new(&FixtureConfig::default())
            .finish(None)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

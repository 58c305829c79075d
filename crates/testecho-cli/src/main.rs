// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
use anyhow::{Context, Result};
use clap::Parser;
use testecho_cli::{Cli, log_filter};
use testecho_core::{Fixture, FixtureError, ProcessStdin};
use tracing::{debug, error};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.debug))
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let code = match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            error!(target: "testecho", kind = %e.kind(), "fatal: {e}");
            eprintln!("{e}");
            e.exit_code()
        }
    };

    // The only place the process terminates on a completed run.
    std::process::exit(code)
}

async fn run(cli: Cli) -> Result<i32, FixtureError> {
    let config = cli.into_config()?;
    debug!(target: "testecho", ?config, "bound configuration");

    let mut stdout = tokio::io::stdout();
    let mut stderr = tokio::io::stderr();
    Fixture::new(config)
        .run(ProcessStdin, &mut stdout, &mut stderr)
        .await
}

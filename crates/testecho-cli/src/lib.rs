// SPDX-License-Identifier: MIT OR Apache-2.0
//! Argument binding and logging setup for the `testecho` binary.
//!
//! These pieces are library-level so they can be tested without
//! spawning the binary.

#![deny(unsafe_code)]

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use testecho_core::{FixtureConfig, FixtureError};
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive for log output.
pub const LOG_ENV: &str = "TESTECHO_LOG";

const EXAMPLES: &str = "\
Examples:
  Print \"out\" to standard output:
    testecho --stdout out

  Same as above but also print \"err\" to standard error:
    testecho --stdout out --stderr err

  Same as above but also exit with code 7 instead of 0:
    testecho --stdout out --stderr err --code 7

  Same as above but also sleep for 5 seconds after printing:
    testecho --stdout out --stderr err --code 7 --sleep 5

  Spawn another testecho process, print its PID, and then sleep \"forever\" (10000 seconds):
    testecho --spawn

  Same as above but also print \"err\" to standard error:
    testecho --spawn --stderr err

  Print standard input:
    echo \"out\" | testecho

  Same as above but also print \"err\" to standard error:
    echo \"out\" | testecho --stderr err

  Same as above but also exit with code 7 instead of 0:
    echo \"out\" | testecho --stderr err --code 7

  Same as above but also sleep for 5 seconds after printing:
    echo \"out\" | testecho --stderr err --code 7 --sleep 5

Every flag can also be set through a TESTECHO_<FLAG> environment variable.";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "testecho",
    version,
    about = "Control this process's standard output/error, exit code, and run duration",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Exit with this code.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, env = "TESTECHO_CODE")]
    pub code: i32,

    /// Sleep for this number of seconds before exiting (but after printing any selected messages).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, env = "TESTECHO_SLEEP")]
    pub sleep: i64,

    /// Spawn a second testecho process, print its PID to standard output, block while it sleeps for 10000s.
    #[arg(
        long,
        env = "TESTECHO_SPAWN",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub spawn: bool,

    /// Print message to standard error.
    #[arg(
        long,
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true,
        env = "TESTECHO_STDERR"
    )]
    pub stderr: String,

    /// Print message to standard output (if stdin is empty).
    #[arg(
        long,
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true,
        env = "TESTECHO_STDOUT"
    )]
    pub stdout: String,

    /// Enable debug logging on standard error.
    #[arg(long)]
    pub debug: bool,

    /// Not accepted; any value here is a usage error.
    #[arg(hide = true)]
    pub unexpected: Vec<String>,
}

impl Cli {
    /// Turn bound flags into a validated [`FixtureConfig`].
    pub fn into_config(self) -> Result<FixtureConfig, FixtureError> {
        if !self.unexpected.is_empty() {
            return Err(FixtureError::UnexpectedArguments(self.unexpected));
        }
        let config = FixtureConfig {
            exit_code: self.code,
            sleep_seconds: u64::try_from(self.sleep).unwrap_or(0),
            spawn: self.spawn,
            stderr: self.stderr,
            stdout: self.stdout,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Log filter for a run: `--debug` wins, then [`LOG_ENV`], then off.
pub fn log_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("testecho=debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("testecho").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("parse")
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_build_an_empty_config() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config, FixtureConfig::default());
    }

    #[test]
    fn all_flags_bind() {
        let config = parse(&[
            "--code", "7", "--sleep", "2", "--stdout", "out", "--stderr", "err",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.exit_code, 7);
        assert_eq!(config.sleep_seconds, 2);
        assert_eq!(config.stdout, "out");
        assert_eq!(config.stderr, "err");
        assert!(!config.spawn);
    }

    #[test]
    fn spawn_flag_binds() {
        assert!(parse(&["--spawn"]).into_config().unwrap().spawn);
    }

    #[test]
    fn spawn_accepts_explicit_booleans() {
        assert!(parse(&["--spawn=true"]).spawn);
        assert!(!parse(&["--spawn=false"]).spawn);
        assert!(parse(&["--spawn=1"]).spawn);
    }

    #[test]
    fn spawn_does_not_swallow_the_next_token() {
        let cli = parse(&["--spawn", "extra"]);
        assert!(cli.spawn);
        assert_eq!(cli.unexpected, vec!["extra"]);
    }

    #[test]
    fn text_values_may_start_with_a_dash() {
        let cli = parse(&["--stderr", "-x", "--stdout", "--- banner"]);
        assert_eq!(cli.stderr, "-x");
        assert_eq!(cli.stdout, "--- banner");
        let config = cli.into_config().unwrap();
        assert_eq!(config.stderr, "-x");
        assert_eq!(config.stdout, "--- banner");
    }

    #[test]
    fn negative_code_parses_but_is_rejected() {
        let cli = parse(&["--code", "-1"]);
        assert_eq!(cli.code, -1);
        assert!(matches!(
            cli.into_config(),
            Err(FixtureError::NegativeExitCode(-1))
        ));
    }

    #[test]
    fn negative_sleep_means_no_delay() {
        let config = parse(&["--sleep", "-4"]).into_config().unwrap();
        assert_eq!(config.sleep_seconds, 0);
    }

    #[test]
    fn positional_arguments_are_rejected() {
        let err = parse(&["--code", "3", "extra", "more"])
            .into_config()
            .unwrap_err();
        match err {
            FixtureError::UnexpectedArguments(args) => assert_eq!(args, vec!["extra", "more"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn positional_check_precedes_code_check() {
        let err = parse(&["--code", "-1", "extra"]).into_config().unwrap_err();
        assert!(matches!(err, FixtureError::UnexpectedArguments(_)));
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(Cli::try_parse_from(["testecho", "--nope"]).is_err());
    }

    #[test]
    fn debug_flag_enables_logging() {
        assert_eq!(log_filter(true).to_string(), "testecho=debug");
    }
}

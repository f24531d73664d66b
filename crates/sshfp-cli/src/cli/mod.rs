//! CLI argument parsing and the process exit contract.

pub mod args;

use std::process::ExitCode;

use args::Cli;
use clap::Parser;
use sshfp_core::Report;

use crate::check;
use crate::config::CheckConfig;
use crate::logging;

/// Run the plugin and return its exit status.
///
/// Exactly one report is printed to stdout. Argument errors, `--help`
/// and `--version` are all UNKNOWN (3): no check was performed.
pub async fn run() -> ExitCode {
    logging::init();

    let report = match Cli::try_parse() {
        Ok(cli) => check::guarded(check::check_host(cli.hostname, CheckConfig::default())).await,
        Err(err) => Report::unknown(&err.to_string()),
    };

    print!("{report}");
    ExitCode::from(report.exit_code())
}

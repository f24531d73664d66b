//! check_sshfp - verify SSHFP DNS records against live SSH host keys.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    sshfp_cli::run().await
}

//! Command-line argument definitions using clap.

use clap::{ColorChoice, Parser};

/// Check that a host's SSHFP DNS records match the SSH host keys it offers.
///
/// Queries the zone's authoritative nameserver directly and compares the
/// published fingerprints against `ssh-keyscan` output.
#[derive(Parser, Debug)]
#[command(name = "check_sshfp")]
#[command(author, version, about, long_about = None)]
#[command(color = ColorChoice::Never)]
pub struct Cli {
    /// Host whose SSHFP records and SSH host keys are compared
    pub hostname: String,
}

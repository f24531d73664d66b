//! Compiled-in check settings.
//!
//! The plugin takes no flags or config file; these defaults are the whole
//! configuration surface.

use std::path::PathBuf;
use std::time::Duration;

use sshfp_core::KeyAlgorithm;
use sshfp_recon::KeyscanConfig;

/// Settings for one check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Per-query DNS timeout.
    pub dns_timeout: Duration,

    /// Upper bound on the key scanner's run time.
    pub scan_timeout: Duration,

    /// Key scanner executable.
    pub keyscan_program: PathBuf,

    /// Key families requested from the scanner.
    pub key_types: Vec<KeyAlgorithm>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            dns_timeout: default_dns_timeout(),
            scan_timeout: default_scan_timeout(),
            keyscan_program: default_keyscan_program(),
            key_types: KeyAlgorithm::ALL.to_vec(),
        }
    }
}

impl CheckConfig {
    /// Key scanner settings derived from this config.
    pub fn keyscan(&self) -> KeyscanConfig {
        KeyscanConfig {
            program: self.keyscan_program.clone(),
            key_types: self.key_types.clone(),
            timeout: self.scan_timeout,
        }
    }
}

const fn default_dns_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_scan_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_keyscan_program() -> PathBuf {
    PathBuf::from("ssh-keyscan")
}

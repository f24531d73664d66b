use sshfp_core::SshfpError;
use thiserror::Error;

/// Result type alias for DNS and key-scan operations
pub type ReconResult<T> = std::result::Result<T, ReconError>;

/// Errors from the DNS and key-scan adapters
#[derive(Error, Debug)]
pub enum ReconError {
    /// Neither the host nor its enclosing zone has NS records
    #[error("Unable to find nameservers for {0}")]
    NoNameservers(String),

    /// The chosen nameserver name did not resolve
    #[error("Unable to find address for nameserver {0}")]
    NoNameserverAddress(String),

    /// DNS query failed for a reason other than an empty answer
    #[error("DNS {record} lookup for {name} failed: {message}")]
    Dns {
        /// Queried name
        name: String,
        /// Queried record type
        record: &'static str,
        /// Resolver error text
        message: String,
    },

    /// DNS query did not complete in time
    #[error("DNS {record} lookup for {name} timed out after {secs}s")]
    DnsTimeout {
        /// Queried name
        name: String,
        /// Queried record type
        record: &'static str,
        /// Configured timeout
        secs: u64,
    },

    /// Hostname is not a valid DNS name
    #[error("invalid hostname {name:?}: {message}")]
    InvalidName {
        /// Hostname as given
        name: String,
        /// Parser error text
        message: String,
    },

    /// Key-scan program could not be started
    #[error("failed to run {program}: {source}")]
    ScanSpawn {
        /// Program that was run
        program: String,
        /// Underlying spawn error
        source: std::io::Error,
    },

    /// Key-scan program exited unsuccessfully
    #[error("{program} failed for {host} ({status}): {diagnostics}")]
    ScanFailed {
        /// Program that was run
        program: String,
        /// Scanned host
        host: String,
        /// Exit status description
        status: String,
        /// Non-comment stderr lines
        diagnostics: String,
    },

    /// Key-scan program exited cleanly but printed no keys
    #[error("{program} returned no keys for {host}: {diagnostics}")]
    ScanEmpty {
        /// Program that was run
        program: String,
        /// Scanned host
        host: String,
        /// Non-comment stderr lines
        diagnostics: String,
    },

    /// Key-scan program did not exit in time
    #[error("{program} timed out after {secs}s scanning {host}")]
    ScanTimeout {
        /// Program that was run
        program: String,
        /// Scanned host
        host: String,
        /// Configured timeout
        secs: u64,
    },

    /// A key-scan output line was not `<host> <type> <base64>`
    #[error("malformed key-scan line: {0:?}")]
    MalformedScanLine(String),

    /// Unsupported algorithm or undecodable key material
    #[error(transparent)]
    Sshfp(#[from] SshfpError),

    /// I/O error talking to the key-scan process
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconError {
    /// Expected operational failures (DNS or key-scan unavailable).
    ///
    /// These are reported as CRITICAL with a short message. Everything else
    /// means a payload the check does not understand or an internal fault.
    pub const fn is_operational(&self) -> bool {
        matches!(
            self,
            Self::NoNameservers(_)
                | Self::NoNameserverAddress(_)
                | Self::Dns { .. }
                | Self::DnsTimeout { .. }
                | Self::ScanSpawn { .. }
                | Self::ScanFailed { .. }
                | Self::ScanEmpty { .. }
                | Self::ScanTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operational_split() {
        assert!(ReconError::NoNameservers("h".into()).is_operational());
        assert!(ReconError::ScanEmpty {
            program: "ssh-keyscan".into(),
            host: "h".into(),
            diagnostics: String::new(),
        }
        .is_operational());
        assert!(!ReconError::MalformedScanLine("x".into()).is_operational());
        assert!(!ReconError::Sshfp(SshfpError::UnknownAlgorithmCode(9)).is_operational());
    }

    #[test]
    fn nameserver_message() {
        assert_eq!(
            ReconError::NoNameservers("host.example.com".into()).to_string(),
            "Unable to find nameservers for host.example.com"
        );
    }
}

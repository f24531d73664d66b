use thiserror::Error;

/// Result type alias for SSHFP domain operations
pub type Result<T> = std::result::Result<T, SshfpError>;

/// Errors raised while interpreting SSHFP or key-scan payloads
#[derive(Error, Debug)]
pub enum SshfpError {
    /// Key material was not valid base64
    #[error("invalid base64 key material: {0}")]
    Decode(#[from] base64::DecodeError),

    /// SSHFP algorithm number outside the supported set
    #[error("unrecognized SSHFP key algorithm number {0}")]
    UnknownAlgorithmCode(u8),

    /// SSH key type name outside the supported set
    #[error("unrecognized SSH key type {0:?}")]
    UnknownAlgorithmName(String),

    /// SSHFP fingerprint type number outside the supported set
    #[error("unrecognized SSHFP fingerprint type {0}")]
    UnknownFingerprintType(u8),
}

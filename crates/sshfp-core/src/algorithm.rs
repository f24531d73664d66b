//! SSHFP key and fingerprint algorithm registries.
//!
//! Key algorithms map both ways between the SSHFP algorithm number
//! ([RFC 4255], [RFC 6594], [RFC 7479]) and the key type name printed by
//! `ssh-keyscan`. Anything outside the table is an error, never skipped.
//!
//! [RFC 4255]: https://tools.ietf.org/html/rfc4255
//! [RFC 6594]: https://tools.ietf.org/html/rfc6594
//! [RFC 7479]: https://tools.ietf.org/html/rfc7479

use std::fmt;
use std::str::FromStr;

use crate::digest;
use crate::error::{Result, SshfpError};

/// Host key algorithms that can appear in an SSHFP record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyAlgorithm {
    /// RSA (`ssh-rsa`, SSHFP 1)
    Rsa,
    /// DSA (`ssh-dss`, SSHFP 2)
    Dss,
    /// ECDSA over NIST P-256 (`ecdsa-sha2-nistp256`, SSHFP 3)
    EcdsaP256,
    /// Ed25519 (`ssh-ed25519`, SSHFP 4)
    Ed25519,
}

/// `(algorithm, SSHFP number, ssh key type, ssh-keyscan -t family)`
const KEY_ALGORITHMS: [(KeyAlgorithm, u8, &str, &str); 4] = [
    (KeyAlgorithm::Rsa, 1, "ssh-rsa", "rsa"),
    (KeyAlgorithm::Dss, 2, "ssh-dss", "dsa"),
    (KeyAlgorithm::EcdsaP256, 3, "ecdsa-sha2-nistp256", "ecdsa"),
    (KeyAlgorithm::Ed25519, 4, "ssh-ed25519", "ed25519"),
];

impl KeyAlgorithm {
    /// Every supported key algorithm, in SSHFP number order.
    pub const ALL: [Self; 4] = [Self::Rsa, Self::Dss, Self::EcdsaP256, Self::Ed25519];

    const fn entry(self) -> (Self, u8, &'static str, &'static str) {
        KEY_ALGORITHMS[self as usize]
    }

    /// SSHFP algorithm number.
    pub const fn code(self) -> u8 {
        self.entry().1
    }

    /// Key type name as `ssh-keyscan` prints it.
    pub const fn ssh_name(self) -> &'static str {
        self.entry().2
    }

    /// Family name accepted by `ssh-keyscan -t`.
    pub const fn scan_family(self) -> &'static str {
        self.entry().3
    }

    /// Look up a key algorithm by SSHFP algorithm number.
    pub fn from_code(code: u8) -> Result<Self> {
        KEY_ALGORITHMS
            .iter()
            .find(|entry| entry.1 == code)
            .map(|entry| entry.0)
            .ok_or(SshfpError::UnknownAlgorithmCode(code))
    }

    /// Look up a key algorithm by `ssh-keyscan` key type name.
    pub fn from_ssh_name(name: &str) -> Result<Self> {
        KEY_ALGORITHMS
            .iter()
            .find(|entry| entry.2 == name)
            .map(|entry| entry.0)
            .ok_or_else(|| SshfpError::UnknownAlgorithmName(name.to_string()))
    }
}

impl TryFrom<u8> for KeyAlgorithm {
    type Error = SshfpError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

impl FromStr for KeyAlgorithm {
    type Err = SshfpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_ssh_name(s)
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ssh_name())
    }
}

/// SSHFP fingerprint types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FingerprintAlgorithm {
    /// SHA-1, 20-byte digest (SSHFP type 1)
    Sha1,
    /// SHA-256, 32-byte digest (SSHFP type 2)
    Sha256,
}

impl FingerprintAlgorithm {
    /// SSHFP fingerprint type number.
    pub const fn code(self) -> u8 {
        match self {
            Self::Sha1 => 1,
            Self::Sha256 => 2,
        }
    }

    /// Length in bytes of the digest this algorithm produces.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Look up a fingerprint type by SSHFP number.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Sha1),
            2 => Ok(Self::Sha256),
            other => Err(SshfpError::UnknownFingerprintType(other)),
        }
    }

    /// Fingerprint raw (already base64-decoded) key bytes.
    pub fn digest(self, key: &[u8]) -> Vec<u8> {
        digest::digest(self, key)
    }
}

impl TryFrom<u8> for FingerprintAlgorithm {
    type Error = SshfpError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "sha1"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

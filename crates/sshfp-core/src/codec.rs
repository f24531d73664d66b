//! Base64 key material in, lowercase hex fingerprints out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::algorithm::FingerprintAlgorithm;
use crate::error::Result;

/// Decode the base64 key blob printed by `ssh-keyscan`.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}

/// Lowercase hex, as SSHFP presentation format uses.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Hex SHA-256 fingerprint of raw key bytes.
///
/// Corrective records are always issued as fingerprint type 2.
#[must_use]
pub fn corrective_fingerprint(key: &[u8]) -> String {
    encode_hex(&FingerprintAlgorithm::Sha256.digest(key))
}

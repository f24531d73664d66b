//! One-shot fingerprint digests via `ring::digest`.

use ring::digest::{digest as ring_digest, SHA1_FOR_LEGACY_USE_ONLY, SHA256};

use crate::algorithm::FingerprintAlgorithm;

/// Digest raw key bytes under the given fingerprint algorithm.
///
/// Input length is never checked; any byte sequence has a fingerprint.
#[must_use]
pub fn digest(algorithm: FingerprintAlgorithm, key: &[u8]) -> Vec<u8> {
    let alg = match algorithm {
        FingerprintAlgorithm::Sha1 => &SHA1_FOR_LEGACY_USE_ONLY,
        FingerprintAlgorithm::Sha256 => &SHA256,
    };
    ring_digest(alg, key).as_ref().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1() {
        let fp = digest(FingerprintAlgorithm::Sha1, b"hello world");
        assert_eq!(fp.len(), FingerprintAlgorithm::Sha1.digest_len());
        assert_eq!(hex::encode(fp), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn test_sha256() {
        let fp = digest(FingerprintAlgorithm::Sha256, b"hello world");
        assert_eq!(fp.len(), FingerprintAlgorithm::Sha256.digest_len());
        assert_eq!(
            hex::encode(fp),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            hex::encode(digest(FingerprintAlgorithm::Sha256, &[])),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}

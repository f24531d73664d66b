//! Published (DNS) and observed (key-scan) host key material.

use std::fmt;

use crate::algorithm::{FingerprintAlgorithm, KeyAlgorithm};
use crate::codec;
use crate::error::Result;

/// One SSHFP record as published in DNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedRecord {
    /// Host key algorithm the record describes
    pub algorithm: KeyAlgorithm,
    /// Digest used to compute the fingerprint
    pub fingerprint_type: FingerprintAlgorithm,
    /// Raw fingerprint bytes
    pub fingerprint: Vec<u8>,
}

impl ExpectedRecord {
    /// Build a record from the numeric fields of an SSHFP RDATA.
    ///
    /// Unsupported algorithm or fingerprint type numbers are errors.
    pub fn from_codes(algorithm: u8, fingerprint_type: u8, fingerprint: Vec<u8>) -> Result<Self> {
        Ok(Self {
            algorithm: KeyAlgorithm::from_code(algorithm)?,
            fingerprint_type: FingerprintAlgorithm::from_code(fingerprint_type)?,
            fingerprint,
        })
    }
}

/// All published records sharing one key algorithm, in DNS order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSet {
    algorithm: KeyAlgorithm,
    records: Vec<ExpectedRecord>,
}

impl ExpectedSet {
    /// Key algorithm shared by every record in the set.
    pub const fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// The records, in the order DNS returned them.
    pub fn records(&self) -> &[ExpectedRecord] {
        &self.records
    }
}

/// Published records grouped by key algorithm.
///
/// Groups keep the order in which their algorithm first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedSets {
    sets: Vec<ExpectedSet>,
}

impl ExpectedSets {
    /// An empty collection (no SSHFP records published).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the group for its algorithm.
    pub fn insert(&mut self, record: ExpectedRecord) {
        if let Some(set) = self.sets.iter_mut().find(|s| s.algorithm == record.algorithm) {
            set.records.push(record);
        } else {
            self.sets.push(ExpectedSet {
                algorithm: record.algorithm,
                records: vec![record],
            });
        }
    }

    /// Group for `algorithm` and its position in first-appearance order.
    pub fn find(&self, algorithm: KeyAlgorithm) -> Option<(usize, &ExpectedSet)> {
        self.sets
            .iter()
            .enumerate()
            .find(|(_, s)| s.algorithm == algorithm)
    }

    /// Group for `algorithm`, if any record was published for it.
    pub fn get(&self, algorithm: KeyAlgorithm) -> Option<&ExpectedSet> {
        self.find(algorithm).map(|(_, set)| set)
    }

    /// Iterate groups in first-appearance order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExpectedSet> {
        self.sets.iter()
    }

    /// Number of distinct key algorithms published.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when no SSHFP record was published at all.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total number of published records across all algorithms.
    pub fn record_count(&self) -> usize {
        self.sets.iter().map(|s| s.records.len()).sum()
    }
}

impl FromIterator<ExpectedRecord> for ExpectedSets {
    fn from_iter<I: IntoIterator<Item = ExpectedRecord>>(iter: I) -> Self {
        let mut sets = Self::new();
        for record in iter {
            sets.insert(record);
        }
        sets
    }
}

impl<'a> IntoIterator for &'a ExpectedSets {
    type Item = &'a ExpectedSet;
    type IntoIter = std::slice::Iter<'a, ExpectedSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One host key offered by the live server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedKey {
    /// Key algorithm reported by the scanner
    pub algorithm: KeyAlgorithm,
    /// Base64 key blob, exactly as the scanner printed it
    pub key: String,
}

impl ObservedKey {
    pub fn new(algorithm: KeyAlgorithm, key: impl Into<String>) -> Self {
        Self {
            algorithm,
            key: key.into(),
        }
    }

    /// Raw key bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        codec::decode_base64(&self.key)
    }
}

/// An SSHFP record in zone-file presentation form.
///
/// Renders as `<name> IN SSHFP <algorithm> <type> <hex>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshfpRecord {
    pub name: String,
    pub algorithm: KeyAlgorithm,
    pub fingerprint_type: FingerprintAlgorithm,
    pub fingerprint: Vec<u8>,
}

impl SshfpRecord {
    /// The record an operator should publish for a raw host key.
    pub fn corrective(name: &str, algorithm: KeyAlgorithm, key: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            algorithm,
            fingerprint_type: FingerprintAlgorithm::Sha256,
            fingerprint: FingerprintAlgorithm::Sha256.digest(key),
        }
    }

    /// Presentation form of an already-published record.
    pub fn published(name: &str, record: &ExpectedRecord) -> Self {
        Self {
            name: name.to_string(),
            algorithm: record.algorithm,
            fingerprint_type: record.fingerprint_type,
            fingerprint: record.fingerprint.clone(),
        }
    }
}

impl fmt::Display for SshfpRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} IN SSHFP {} {} {}",
            self.name,
            self.algorithm.code(),
            self.fingerprint_type.code(),
            codec::encode_hex(&self.fingerprint)
        )
    }
}

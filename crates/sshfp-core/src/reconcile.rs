//! Cross-reference published SSHFP records against live host keys.
//!
//! Two passes:
//!
//! 1. Each observed key, in scan order. No published group for its
//!    algorithm is [`Verdict::Missing`]. Otherwise every record in the group
//!    is checked independently and each mismatch is a [`Verdict::Stale`].
//! 2. Each published group no observed key touched is a [`Verdict::Extra`].
//!
//! Matching records produce nothing. The overall [`Severity`] is the
//! maximum over all verdicts, or `Ok` when there are none.

use std::fmt;

use tracing::debug;

use crate::algorithm::{FingerprintAlgorithm, KeyAlgorithm};
use crate::error::Result;
use crate::record::{ExpectedSets, ObservedKey, SshfpRecord};

/// Check outcome, ordered so that `max()` picks the worst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Every published record matches a live key
    #[default]
    Ok,
    /// Hygiene problem: missing or extra records
    Warning,
    /// A published fingerprint does not match the live key
    Critical,
}

impl Severity {
    /// Plugin status name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one discrepancy between DNS and the live server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The server offers a key with no SSHFP record for its algorithm
    Missing {
        algorithm: KeyAlgorithm,
        /// Record to add
        add: SshfpRecord,
    },
    /// A published fingerprint does not match the offered key
    Stale {
        algorithm: KeyAlgorithm,
        fingerprint_type: FingerprintAlgorithm,
        /// Fingerprint bytes found in DNS
        published: Vec<u8>,
        /// Fingerprint of the live key under the same digest
        observed: Vec<u8>,
        /// Replacement record
        add: SshfpRecord,
    },
    /// SSHFP records exist for an algorithm the server does not offer
    Extra {
        algorithm: KeyAlgorithm,
        /// Published records to delete
        delete: Vec<SshfpRecord>,
    },
}

impl Verdict {
    /// Severity this verdict contributes to the overall result.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Missing { .. } | Self::Extra { .. } => Severity::Warning,
            Self::Stale { .. } => Severity::Critical,
        }
    }

    /// Key algorithm the verdict concerns.
    pub const fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Missing { algorithm, .. }
            | Self::Stale { algorithm, .. }
            | Self::Extra { algorithm, .. } => *algorithm,
        }
    }

    /// Zone-file lines that would fix this discrepancy.
    pub fn corrective_records(&self) -> &[SshfpRecord] {
        match self {
            Self::Missing { add, .. } | Self::Stale { add, .. } => std::slice::from_ref(add),
            Self::Extra { delete, .. } => delete,
        }
    }
}

/// Result of reconciling one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Discrepancies, pass 1 (scan order) then pass 2 (DNS order)
    pub verdicts: Vec<Verdict>,
    /// Worst severity over `verdicts`
    pub severity: Severity,
    /// Number of SSHFP records published
    pub record_count: usize,
    /// Number of distinct key algorithms published
    pub algorithm_count: usize,
}

/// Reconcile published records for `name` against the keys it offers.
///
/// Pure: the same inputs always give the same verdicts in the same order.
/// Fails only if an observed key is not valid base64.
pub fn reconcile(
    name: &str,
    expected: &ExpectedSets,
    observed: &[ObservedKey],
) -> Result<Reconciliation> {
    let mut matched = vec![false; expected.len()];
    let mut verdicts = Vec::new();

    for key in observed {
        let raw = key.decode()?;

        let Some((index, set)) = expected.find(key.algorithm) else {
            verdicts.push(Verdict::Missing {
                algorithm: key.algorithm,
                add: SshfpRecord::corrective(name, key.algorithm, &raw),
            });
            continue;
        };
        matched[index] = true;

        for record in set.records() {
            let fingerprint = record.fingerprint_type.digest(&raw);
            if fingerprint != record.fingerprint {
                verdicts.push(Verdict::Stale {
                    algorithm: key.algorithm,
                    fingerprint_type: record.fingerprint_type,
                    published: record.fingerprint.clone(),
                    observed: fingerprint,
                    add: SshfpRecord::corrective(name, key.algorithm, &raw),
                });
            }
        }
    }

    for (set, seen) in expected.iter().zip(&matched) {
        if !seen {
            verdicts.push(Verdict::Extra {
                algorithm: set.algorithm(),
                delete: set
                    .records()
                    .iter()
                    .map(|r| SshfpRecord::published(name, r))
                    .collect(),
            });
        }
    }

    let severity = verdicts
        .iter()
        .map(Verdict::severity)
        .max()
        .unwrap_or_default();

    debug!(
        name,
        observed = observed.len(),
        published = expected.record_count(),
        verdicts = verdicts.len(),
        %severity,
        "reconciled SSHFP records"
    );

    Ok(Reconciliation {
        verdicts,
        severity,
        record_count: expected.record_count(),
        algorithm_count: expected.len(),
    })
}

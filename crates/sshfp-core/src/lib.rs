//! # sshfp-core
//!
//! Pure domain layer for `check_sshfp`: compares the SSHFP records a zone
//! publishes against the host keys an SSH server actually offers.
//!
//! ## Data Flow
//!
//! ```text
//! DNS SSHFP records -> ExpectedRecord -> ExpectedSets (grouped by key algorithm)
//! ssh-keyscan lines -> ObservedKey
//!   -> reconcile()  -> Reconciliation { verdicts, severity }
//!   -> Report       -> "SSHFP <STATUS>: ..." lines + exit status
//! ```
//!
//! Nothing in this crate performs I/O. The DNS and key-scan adapters live in
//! `sshfp-recon`.

#![doc(html_root_url = "https://docs.rs/sshfp-core/0.1.0")]

pub mod algorithm;
pub mod codec;
pub mod digest;
mod error;
pub mod reconcile;
pub mod record;
pub mod report;

pub use algorithm::{FingerprintAlgorithm, KeyAlgorithm};
pub use error::{Result, SshfpError};
pub use reconcile::{reconcile, Reconciliation, Severity, Verdict};
pub use record::{ExpectedRecord, ExpectedSet, ExpectedSets, ObservedKey, SshfpRecord};
pub use report::{Report, Status};

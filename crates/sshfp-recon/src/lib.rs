//! Adapters to the two outside sources `check_sshfp` compares:
//!
//! - [`dns`]: SSHFP records, fetched straight from the zone's authoritative
//!   nameserver so recursive caches cannot hide a stale record
//! - [`keyscan`]: host keys the SSH server offers right now, via `ssh-keyscan`
//!
//! Both sit behind async traits ([`DnsBackend`], [`KeyScanner`]) so the check
//! pipeline can run against in-memory fakes.

#![doc(html_root_url = "https://docs.rs/sshfp-recon/0.1.0")]

pub mod dns;
mod error;
pub mod keyscan;

pub use dns::{resolve_authoritative_sshfp, DnsBackend, HickoryBackend, NsAnswer, RawSshfp};
pub use error::{ReconError, ReconResult};
pub use hickory_resolver::proto::rr::Name;
pub use keyscan::{KeyScanner, KeyscanConfig, SshKeyscan};

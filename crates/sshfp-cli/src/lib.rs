//! # sshfp-cli
//!
//! `check_sshfp <hostname>`: a monitoring plugin that compares the SSHFP
//! records published for a host against the keys its SSH server offers.
//!
//! | Exit | Status   | Meaning                                        |
//! |------|----------|------------------------------------------------|
//! | 0    | OK       | every published record matches a live key      |
//! | 1    | WARNING  | missing or extra records                       |
//! | 2    | CRITICAL | stale record, or DNS / key scan unavailable    |
//! | 3    | UNKNOWN  | bad arguments, unexpected payload, or a defect |

pub mod check;
pub mod cli;
pub mod config;
pub mod logging;

pub use cli::run;

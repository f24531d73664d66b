//! Monitoring-plugin output: `SSHFP <STATUS>: <message>` lines and an exit status.

use std::fmt;

use crate::codec::encode_hex;
use crate::reconcile::{Reconciliation, Severity, Verdict};

/// Prefix on every status line.
pub const TAG: &str = "SSHFP";

/// Plugin status, numbered by exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    /// The check could not be completed
    Unknown = 3,
}

impl Status {
    /// Process exit status for this result.
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<Severity> for Status {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Ok => Self::Ok,
            Severity::Warning => Self::Warning,
            Severity::Critical => Self::Critical,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    status: Status,
    lines: Vec<String>,
}

impl Report {
    /// One status line per verdict, each followed by its corrective records.
    ///
    /// With no verdicts the report is a single OK summary line.
    pub fn from_reconciliation(result: &Reconciliation) -> Self {
        if result.verdicts.is_empty() {
            return Self::single(
                Status::Ok,
                &format!(
                    "{} records for {} algorithms",
                    result.record_count, result.algorithm_count
                ),
            );
        }

        let mut lines = Vec::new();
        for verdict in &result.verdicts {
            lines.push(status_line(verdict.severity().into(), &describe(verdict)));
            lines.extend(verdict.corrective_records().iter().map(ToString::to_string));
        }

        Self {
            status: result.severity.into(),
            lines,
        }
    }

    /// Expected operational failure, reported without a trace.
    pub fn critical(message: &str) -> Self {
        Self::single(Status::Critical, message)
    }

    /// Unanticipated failure. Multi-line `detail` is kept as-is after the
    /// first line.
    pub fn unknown(detail: &str) -> Self {
        let mut parts = detail.lines();
        let first = parts.next().unwrap_or("unexpected failure");
        let mut lines = vec![status_line(Status::Unknown, first)];
        lines.extend(parts.map(str::to_string));
        Self {
            status: Status::Unknown,
            lines,
        }
    }

    fn single(status: Status, message: &str) -> Self {
        Self {
            status,
            lines: vec![status_line(status, message)],
        }
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub const fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn status_line(status: Status, message: &str) -> String {
    format!("{TAG} {status}: {message}")
}

fn describe(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Missing { algorithm, .. } => {
            format!("No SSHFP record for {algorithm} host key, add:")
        }
        Verdict::Stale {
            algorithm,
            fingerprint_type,
            published,
            observed,
            ..
        } => format!(
            "Stale SSHFP {fingerprint_type} record for {algorithm}: published {}, host key is {}, replace with:",
            encode_hex(published),
            encode_hex(observed)
        ),
        Verdict::Extra { algorithm, .. } => {
            format!("SSHFP record for {algorithm} but host offers no such key, delete:")
        }
    }
}

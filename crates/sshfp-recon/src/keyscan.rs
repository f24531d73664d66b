//! Live host keys via `ssh-keyscan`.
//!
//! stdout carries one `<host> <key-type> <base64>` line per key. stderr
//! carries `# host:port SSH-2.0-...` banner comments and, on failure, the
//! actual error text.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use sshfp_core::{KeyAlgorithm, ObservedKey};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{ReconError, ReconResult};

/// Source of the host keys a server currently offers.
#[async_trait]
pub trait KeyScanner: Send + Sync {
    /// Every key the server offers, in the order the scanner reported them.
    async fn scan(&self, host: &str) -> ReconResult<Vec<ObservedKey>>;
}

/// How to run the key scanner.
#[derive(Debug, Clone)]
pub struct KeyscanConfig {
    /// Scanner executable
    pub program: PathBuf,
    /// Key families requested with `-t`
    pub key_types: Vec<KeyAlgorithm>,
    /// Upper bound on the scanner's run time
    pub timeout: Duration,
}

impl Default for KeyscanConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ssh-keyscan"),
            key_types: KeyAlgorithm::ALL.to_vec(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// [`KeyScanner`] that runs `ssh-keyscan -t <families> <host>`.
#[derive(Debug, Clone, Default)]
pub struct SshKeyscan {
    config: KeyscanConfig,
}

impl SshKeyscan {
    pub const fn new(config: KeyscanConfig) -> Self {
        Self { config }
    }

    fn program(&self) -> String {
        self.config.program.display().to_string()
    }

    fn families(&self) -> String {
        self.config
            .key_types
            .iter()
            .map(|alg| alg.scan_family())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl KeyScanner for SshKeyscan {
    async fn scan(&self, host: &str) -> ReconResult<Vec<ObservedKey>> {
        let program = self.program();
        let families = self.families();
        debug!(%program, host, %families, "starting key scan");

        let mut child = Command::new(&self.config.program)
            .arg("-t")
            .arg(&families)
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ReconError::ScanSpawn {
                program: program.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.config.timeout, drain(&mut child))
            .await
            .map_err(|_| ReconError::ScanTimeout {
                program: program.clone(),
                host: host.to_string(),
                secs: self.config.timeout.as_secs(),
            })??;

        debug!(
            %program,
            host,
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            "key scan finished"
        );
        interpret(&program, host, &output)
    }
}

/// Everything the scanner produced.
#[derive(Debug)]
struct ScanOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Read stdout and stderr to EOF concurrently, then reap the child.
///
/// Reading one pipe to the end before touching the other can deadlock once
/// the child fills the unread pipe's buffer.
async fn drain(child: &mut Child) -> ReconResult<ScanOutput> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("key scan stdout was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("key scan stderr was not captured"))?;

    let mut out = Vec::new();
    let mut err = Vec::new();
    tokio::try_join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err))?;
    let status = child.wait().await?;

    Ok(ScanOutput {
        status,
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    })
}

fn interpret(program: &str, host: &str, output: &ScanOutput) -> ReconResult<Vec<ObservedKey>> {
    if !output.status.success() {
        let diagnostics = diagnostics(&output.stderr);
        warn!(program, host, status = %output.status, %diagnostics, "key scan failed");
        return Err(ReconError::ScanFailed {
            program: program.to_string(),
            host: host.to_string(),
            status: output.status.to_string(),
            diagnostics,
        });
    }

    let keys = parse_scan_output(&output.stdout)?;
    if keys.is_empty() {
        // ssh-keyscan exits 0 when it cannot reach the host at all
        return Err(ReconError::ScanEmpty {
            program: program.to_string(),
            host: host.to_string(),
            diagnostics: diagnostics(&output.stderr),
        });
    }
    Ok(keys)
}

/// stderr without blank lines and `#` banner comments, joined with `; `.
fn diagnostics(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse scanner stdout. Blank and `#` lines are ignored; any other line that
/// does not parse fails the whole scan.
pub fn parse_scan_output(stdout: &str) -> ReconResult<Vec<ObservedKey>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_scan_line)
        .collect()
}

/// Parse one `<host> <key-type> <base64>` line.
pub fn parse_scan_line(line: &str) -> ReconResult<ObservedKey> {
    let mut fields = line.split_whitespace();
    let (Some(_host), Some(key_type), Some(key), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(ReconError::MalformedScanLine(line.to_string()));
    };
    Ok(ObservedKey::new(KeyAlgorithm::from_ssh_name(key_type)?, key))
}

//! The check pipeline and its two error boundaries.
//!
//! ```text
//! hostname -> authoritative SSHFP lookup -> key scan -> reconcile -> Report
//! ```
//!
//! DNS and key-scan outages are turned into a CRITICAL report right where
//! they happen. Anything else (unsupported algorithm, bad base64, malformed
//! scanner output, a panic) escapes to [`guarded`] and becomes UNKNOWN with
//! the full error chain.

use std::any::Any;
use std::future::Future;

use anyhow::Context as _;
use sshfp_core::{reconcile, Report};
use sshfp_recon::{
    resolve_authoritative_sshfp, DnsBackend, HickoryBackend, KeyScanner, ReconError, SshKeyscan,
};
use tracing::info;

use crate::config::CheckConfig;

/// Check `host` using the system resolver and `ssh-keyscan`.
pub async fn check_host(host: String, config: CheckConfig) -> anyhow::Result<Report> {
    let dns = match HickoryBackend::from_system_conf(config.dns_timeout) {
        Ok(dns) => dns,
        Err(err) if err.is_operational() => return Ok(Report::critical(&err.to_string())),
        Err(err) => return Err(err.into()),
    };
    let scanner = SshKeyscan::new(config.keyscan());
    check(&host, &dns, &scanner).await
}

/// Run the full pipeline for `host` against the given adapters.
///
/// Returns `Ok` for every outcome that has a defined plugin status other
/// than UNKNOWN.
pub async fn check<D, S>(host: &str, dns: &D, scanner: &S) -> anyhow::Result<Report>
where
    D: DnsBackend + ?Sized,
    S: KeyScanner + ?Sized,
{
    let expected = match resolve_authoritative_sshfp(dns, host).await {
        Ok(expected) => expected,
        Err(err) => {
            return triage(err).with_context(|| format!("resolving SSHFP records for {host}"))
        }
    };

    let observed = match scanner.scan(host).await {
        Ok(observed) => observed,
        Err(err) => return triage(err).with_context(|| format!("scanning host keys of {host}")),
    };

    let result = reconcile(host, &expected, &observed)
        .with_context(|| format!("reconciling SSHFP records for {host}"))?;
    info!(
        host,
        severity = %result.severity,
        verdicts = result.verdicts.len(),
        "check complete"
    );
    Ok(Report::from_reconciliation(&result))
}

/// CRITICAL report for operational failures, error for everything else.
fn triage(err: ReconError) -> Result<Report, ReconError> {
    if err.is_operational() {
        info!(error = %err, "check failed");
        Ok(Report::critical(&err.to_string()))
    } else {
        Err(err)
    }
}

/// Outermost boundary: run `pipeline` on its own task so that neither an
/// error nor a panic can escape without a report.
pub async fn guarded<F>(pipeline: F) -> Report
where
    F: Future<Output = anyhow::Result<Report>> + Send + 'static,
{
    match tokio::spawn(pipeline).await {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => Report::unknown(&format!("{err:?}")),
        Err(join) if join.is_panic() => {
            Report::unknown(&format!("internal error: {}", panic_message(&*join.into_panic())))
        }
        Err(join) => Report::unknown(&format!("internal error: {join}")),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("panic with non-string payload")
}

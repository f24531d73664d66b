//! Authoritative SSHFP resolution.
//!
//! ```text
//! NS <host>?  -- empty --> SOA owner from the negative answer -> NS <zone>?
//!   -> first NS name -> A/AAAA -> SSHFP <host> @ that address (no recursion, no cache)
//! ```
//!
//! Recursive resolvers may serve cached SSHFP data for up to the record TTL,
//! which is exactly the staleness this check exists to catch, so the final
//! query always goes to the authoritative server.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{Name, RData, RecordType};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, ResolveErrorKind, TokioResolver};
use sshfp_core::{ExpectedRecord, ExpectedSets};
use tracing::{debug, info};

use crate::error::{ReconError, ReconResult};

/// Port authoritative nameservers are queried on.
const DNS_PORT: u16 = 53;

/// Answer to an NS query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsAnswer {
    /// NS names, in answer order
    Nameservers(Vec<Name>),
    /// No NS record set; `zone` is the owner of the SOA in the authority
    /// section, when the server sent one
    Empty { zone: Option<Name> },
}

/// SSHFP RDATA fields, not yet checked against the supported algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSshfp {
    pub algorithm: u8,
    pub fingerprint_type: u8,
    pub fingerprint: Vec<u8>,
}

/// The DNS operations authoritative resolution needs.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// NS lookup through the system resolver.
    async fn nameservers(&self, name: &Name) -> ReconResult<NsAnswer>;

    /// First address of `name`, or `None` if it has none.
    async fn address(&self, name: &Name) -> ReconResult<Option<IpAddr>>;

    /// SSHFP lookup sent directly to `server`. An empty answer is `Ok(vec![])`.
    async fn sshfp(&self, name: &Name, server: IpAddr) -> ReconResult<Vec<RawSshfp>>;
}

/// Fetch the SSHFP records for `host` from its zone's authoritative server.
///
/// # Errors
///
/// - `ReconError::NoNameservers` if neither `host` nor its zone has NS records
/// - `ReconError::NoNameserverAddress` if the first nameserver has no address
/// - `ReconError::Sshfp` if a record uses an unsupported algorithm or type
pub async fn resolve_authoritative_sshfp<B>(backend: &B, host: &str) -> ReconResult<ExpectedSets>
where
    B: DnsBackend + ?Sized,
{
    let name = fqdn(host)?;

    let nameservers = match backend.nameservers(&name).await? {
        NsAnswer::Nameservers(ns) => ns,
        NsAnswer::Empty { zone: Some(zone) } => {
            debug!(%name, %zone, "no NS records at host, using enclosing zone");
            match backend.nameservers(&zone).await? {
                NsAnswer::Nameservers(ns) => ns,
                NsAnswer::Empty { .. } => Vec::new(),
            }
        }
        NsAnswer::Empty { zone: None } => Vec::new(),
    };

    let Some(primary) = nameservers.first() else {
        return Err(ReconError::NoNameservers(host.to_string()));
    };

    let Some(server) = backend.address(primary).await? else {
        return Err(ReconError::NoNameserverAddress(primary.to_string()));
    };
    info!(%name, nameserver = %primary, %server, "querying authoritative nameserver");

    let records = backend.sshfp(&name, server).await?;
    debug!(%name, count = records.len(), "SSHFP records received");

    let expected = records
        .into_iter()
        .map(|r| ExpectedRecord::from_codes(r.algorithm, r.fingerprint_type, r.fingerprint))
        .collect::<Result<ExpectedSets, _>>()?;
    Ok(expected)
}

/// Parse `host` as a fully-qualified name so search domains never apply.
fn fqdn(host: &str) -> ReconResult<Name> {
    let absolute = if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{host}.")
    };
    Name::from_ascii(&absolute).map_err(|e| ReconError::InvalidName {
        name: host.to_string(),
        message: e.to_string(),
    })
}

/// [`DnsBackend`] on hickory-resolver.
pub struct HickoryBackend {
    resolver: TokioResolver,
    timeout: Duration,
}

impl HickoryBackend {
    /// Use the system resolver (`/etc/resolv.conf`) for NS and address lookups.
    ///
    /// Every query is a single attempt bounded by `timeout`.
    pub fn from_system_conf(timeout: Duration) -> ReconResult<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| ReconError::Dns {
                name: String::from("."),
                record: "resolver",
                message: format!("failed to read system resolver configuration: {e}"),
            })?
            .with_options(options(timeout))
            .build();
        Ok(Self { resolver, timeout })
    }

    /// One-off resolver pointed at a single authoritative server.
    fn authoritative(&self, server: IpAddr) -> TokioResolver {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[server], DNS_PORT, true),
        );
        let mut opts = options(self.timeout);
        opts.recursion_desired = false;
        opts.cache_size = 0;
        TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build()
    }

    /// Bound a lookup by the configured timeout. The outer error is the
    /// timeout, the inner one whatever the resolver reported.
    async fn timed<T, F>(
        &self,
        name: &Name,
        record: &'static str,
        lookup: F,
    ) -> ReconResult<Result<T, ResolveError>>
    where
        F: Future<Output = Result<T, ResolveError>> + Send,
    {
        tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| ReconError::DnsTimeout {
                name: name.to_string(),
                record,
                secs: self.timeout.as_secs(),
            })
    }
}

#[async_trait]
impl DnsBackend for HickoryBackend {
    async fn nameservers(&self, name: &Name) -> ReconResult<NsAnswer> {
        debug!(%name, "NS lookup");
        match self.timed(name, "NS", self.resolver.ns_lookup(name.clone())).await? {
            Ok(lookup) => Ok(NsAnswer::Nameservers(
                lookup.iter().map(|ns| ns.0.clone()).collect(),
            )),
            Err(e) => match no_records_zone(&e) {
                Some(zone) => Ok(NsAnswer::Empty { zone }),
                None => Err(query_failed(name, "NS", &e)),
            },
        }
    }

    async fn address(&self, name: &Name) -> ReconResult<Option<IpAddr>> {
        debug!(%name, "address lookup");
        match self.timed(name, "A/AAAA", self.resolver.lookup_ip(name.clone())).await? {
            Ok(lookup) => Ok(lookup.iter().next()),
            Err(e) if no_records_zone(&e).is_some() => Ok(None),
            Err(e) => Err(query_failed(name, "A/AAAA", &e)),
        }
    }

    async fn sshfp(&self, name: &Name, server: IpAddr) -> ReconResult<Vec<RawSshfp>> {
        debug!(%name, %server, "SSHFP lookup");
        let resolver = self.authoritative(server);
        match self
            .timed(name, "SSHFP", resolver.lookup(name.clone(), RecordType::SSHFP))
            .await?
        {
            Ok(lookup) => Ok(lookup
                .iter()
                .filter_map(|rdata| match rdata {
                    RData::SSHFP(sshfp) => Some(RawSshfp {
                        algorithm: u8::from(sshfp.algorithm()),
                        fingerprint_type: u8::from(sshfp.fingerprint_type()),
                        fingerprint: sshfp.fingerprint().to_vec(),
                    }),
                    _ => None,
                })
                .collect()),
            Err(e) if no_records_zone(&e).is_some() => Ok(Vec::new()),
            Err(e) => Err(query_failed(name, "SSHFP", &e)),
        }
    }
}

/// Single attempt, per-query timeout, no result cache shared across lookups.
fn options(timeout: Duration) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.ndots = 0;
    opts
}

/// `Some(zone)` when the error is an empty answer (NODATA or NXDOMAIN),
/// carrying the SOA owner from the authority section if present.
///
/// hickory also reports SERVFAIL, REFUSED and the other failure codes as
/// `NoRecordsFound`; those are query failures, not empty answers.
fn no_records_zone(err: &ResolveError) -> Option<Option<Name>> {
    let ResolveErrorKind::Proto(proto) = err.kind() else {
        return None;
    };
    match proto.kind() {
        ProtoErrorKind::NoRecordsFound {
            soa, response_code, ..
        } if is_empty_answer(*response_code) => {
            Some(soa.as_ref().map(|soa| soa.name().clone()))
        }
        _ => None,
    }
}

/// Only NOERROR (NODATA) and NXDOMAIN mean the name has no such records.
const fn is_empty_answer(code: ResponseCode) -> bool {
    matches!(code, ResponseCode::NoError | ResponseCode::NXDomain)
}

fn query_failed(name: &Name, record: &'static str, err: &ResolveError) -> ReconError {
    ReconError::Dns {
        name: name.to_string(),
        record,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::ProtoError;
    use sshfp_core::{FingerprintAlgorithm, KeyAlgorithm, SshfpError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    #[derive(Default)]
    struct FakeDns {
        ns: HashMap<Name, NsAnswer>,
        addresses: HashMap<Name, IpAddr>,
        sshfp: Vec<RawSshfp>,
        queried: Mutex<Vec<String>>,
    }

    impl FakeDns {
        fn with_ns(mut self, owner: &str, answer: NsAnswer) -> Self {
            self.ns.insert(name(owner), answer);
            self
        }

        fn with_address(mut self, owner: &str, ip: &str) -> Self {
            self.addresses.insert(name(owner), ip.parse().unwrap());
            self
        }

        fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DnsBackend for FakeDns {
        async fn nameservers(&self, name: &Name) -> ReconResult<NsAnswer> {
            self.queried.lock().unwrap().push(format!("NS {name}"));
            Ok(self
                .ns
                .get(name)
                .cloned()
                .unwrap_or(NsAnswer::Empty { zone: None }))
        }

        async fn address(&self, name: &Name) -> ReconResult<Option<IpAddr>> {
            self.queried.lock().unwrap().push(format!("A {name}"));
            Ok(self.addresses.get(name).copied())
        }

        async fn sshfp(&self, name: &Name, server: IpAddr) -> ReconResult<Vec<RawSshfp>> {
            self.queried
                .lock()
                .unwrap()
                .push(format!("SSHFP {name} @{server}"));
            Ok(self.sshfp.clone())
        }
    }

    fn raw(algorithm: u8, fingerprint_type: u8) -> RawSshfp {
        RawSshfp {
            algorithm,
            fingerprint_type,
            fingerprint: vec![0x11; 20],
        }
    }

    #[tokio::test]
    async fn falls_back_to_enclosing_zone() {
        let mut dns = FakeDns::default()
            .with_ns(
                "host.example.com.",
                NsAnswer::Empty {
                    zone: Some(name("example.com.")),
                },
            )
            .with_ns(
                "example.com.",
                NsAnswer::Nameservers(vec![name("ns1.example.com."), name("ns2.example.com.")]),
            )
            .with_address("ns1.example.com.", "192.0.2.53");
        dns.sshfp = vec![raw(1, 1), raw(4, 2), raw(1, 2)];

        let expected = resolve_authoritative_sshfp(&dns, "host.example.com")
            .await
            .unwrap();

        assert_eq!(
            dns.queried(),
            vec![
                "NS host.example.com.",
                "NS example.com.",
                "A ns1.example.com.",
                "SSHFP host.example.com. @192.0.2.53",
            ]
        );
        assert_eq!(expected.len(), 2);
        assert_eq!(expected.record_count(), 3);
        let rsa = expected.get(KeyAlgorithm::Rsa).unwrap();
        assert_eq!(rsa.records()[0].fingerprint_type, FingerprintAlgorithm::Sha1);
        assert_eq!(rsa.records()[1].fingerprint_type, FingerprintAlgorithm::Sha256);
    }

    #[tokio::test]
    async fn zone_apex_uses_its_own_nameservers() {
        let dns = FakeDns::default()
            .with_ns(
                "example.org.",
                NsAnswer::Nameservers(vec![name("a.iana-servers.net.")]),
            )
            .with_address("a.iana-servers.net.", "2001:db8::53");

        let expected = resolve_authoritative_sshfp(&dns, "example.org.").await.unwrap();
        assert!(expected.is_empty());
        assert_eq!(dns.queried()[2], "SSHFP example.org. @2001:db8::53");
    }

    #[tokio::test]
    async fn no_nameservers_anywhere() {
        let dns = FakeDns::default().with_ns(
            "host.example.com.",
            NsAnswer::Empty {
                zone: Some(name("example.com.")),
            },
        );

        let err = resolve_authoritative_sshfp(&dns, "host.example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::NoNameservers(ref h) if h == "host.example.com"));
        assert!(err.to_string().starts_with("Unable to find nameservers"));
        assert_eq!(dns.queried().len(), 2);
    }

    #[tokio::test]
    async fn empty_answer_without_soa_has_no_nameservers() {
        let dns = FakeDns::default();
        let err = resolve_authoritative_sshfp(&dns, "nowhere.invalid")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::NoNameservers(_)));
        assert_eq!(dns.queried().len(), 1);
    }

    #[tokio::test]
    async fn nameserver_without_address() {
        let dns = FakeDns::default().with_ns(
            "example.com.",
            NsAnswer::Nameservers(vec![name("ns1.example.net.")]),
        );

        let err = resolve_authoritative_sshfp(&dns, "example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ReconError::NoNameserverAddress(ref ns) if ns == "ns1.example.net."
        ));
    }

    #[tokio::test]
    async fn unknown_algorithm_number_is_fatal() {
        let mut dns = FakeDns::default()
            .with_ns("example.com.", NsAnswer::Nameservers(vec![name("ns.example.com.")]))
            .with_address("ns.example.com.", "192.0.2.1");
        dns.sshfp = vec![raw(4, 2), raw(6, 2)];

        let err = resolve_authoritative_sshfp(&dns, "example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ReconError::Sshfp(SshfpError::UnknownAlgorithmCode(6))
        ));
        assert!(!err.is_operational());
    }

    #[tokio::test]
    async fn unknown_fingerprint_type_is_fatal() {
        let mut dns = FakeDns::default()
            .with_ns("example.com.", NsAnswer::Nameservers(vec![name("ns.example.com.")]))
            .with_address("ns.example.com.", "192.0.2.1");
        dns.sshfp = vec![raw(1, 0)];

        let err = resolve_authoritative_sshfp(&dns, "example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ReconError::Sshfp(SshfpError::UnknownFingerprintType(0))
        ));
    }

    #[test]
    fn only_noerror_and_nxdomain_are_empty_answers() {
        assert!(is_empty_answer(ResponseCode::NoError));
        assert!(is_empty_answer(ResponseCode::NXDomain));
        for failure in [
            ResponseCode::ServFail,
            ResponseCode::Refused,
            ResponseCode::NotAuth,
            ResponseCode::FormErr,
            ResponseCode::NotImp,
        ] {
            assert!(!is_empty_answer(failure), "{failure} counted as empty");
        }
    }

    #[test]
    fn transport_errors_are_query_failures() {
        let proto = ProtoError::from(ProtoErrorKind::Message("connection refused"));
        let err = ResolveError::from(proto);
        assert!(no_records_zone(&err).is_none());

        let failed = query_failed(&name("host.example.com."), "SSHFP", &err);
        assert!(matches!(
            failed,
            ReconError::Dns { ref name, record: "SSHFP", .. } if name == "host.example.com."
        ));
        assert!(failed.is_operational());
    }

    #[test]
    fn hostnames_are_made_fully_qualified() {
        assert_eq!(
            fqdn("host.example.com").unwrap().to_string(),
            "host.example.com."
        );
        assert!(fqdn("host.example.com.").unwrap().is_fqdn());
    }
}

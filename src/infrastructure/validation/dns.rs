//! URL validation backed by a DNS lookup of the host.

use async_trait::async_trait;
use std::time::Duration;
use url::Host;

use super::{UrlValidator, parse_http_url};
use crate::error::AppError;

/// Validator that additionally requires the URL host to resolve.
///
/// IP literal hosts are accepted without a lookup. A leading `www.` label is
/// dropped before resolving, so `www.example.com` is checked as `example.com`.
/// Lookups that do not finish within `timeout` count as failures.
#[derive(Debug, Clone)]
pub struct DnsUrlValidator {
    timeout: Duration,
}

impl DnsUrlValidator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl UrlValidator for DnsUrlValidator {
    async fn validate(&self, raw: &str) -> Result<(), AppError> {
        let url = parse_http_url(raw)?;

        let host = match url.host() {
            Some(Host::Domain(domain)) => lookup_name(domain).to_string(),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return Ok(()),
            None => return Err(AppError::invalid_url("missing host")),
        };
        let port = url.port_or_known_default().unwrap_or(80);

        match tokio::time::timeout(self.timeout, tokio::net::lookup_host((host.as_str(), port)))
            .await
        {
            Ok(Ok(mut addrs)) => match addrs.next() {
                Some(_) => Ok(()),
                None => Err(AppError::invalid_url(format!("{host} has no addresses"))),
            },
            Ok(Err(e)) => {
                tracing::debug!("DNS lookup failed for {}: {}", host, e);
                Err(AppError::invalid_url(format!("{host} does not resolve")))
            }
            Err(_) => {
                tracing::warn!("DNS lookup timed out for {}", host);
                Err(AppError::invalid_url(format!("{host} lookup timed out")))
            }
        }
    }
}

/// Host name actually resolved for `domain`.
fn lookup_name(domain: &str) -> &str {
    match domain.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") && domain.len() > 4 => &domain[4..],
        _ => domain,
    }
}

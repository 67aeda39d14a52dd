// # HTTP IP Source
//
// This crate discovers the current public IP address by asking an HTTP
// discovery service.
//
// The service answers a single GET with a JSON document offering an
// optional IPv4 and an optional IPv6 address:
//
// ```json
// { "ipv4": "198.51.100.7", "ipv6": "2001:db8::7" }
// ```
//
// IPv4 is preferred when both are present. Each observation is fetched
// fresh; nothing is cached between calls.

use async_trait::async_trait;
use dyndns_core::traits::IpSource;
use dyndns_core::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Default discovery endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.serhiy.io/v1/stats/ip";

/// Default HTTP timeout for discovery requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// What the discovery service reports
#[derive(Debug, Default, Deserialize)]
struct DiscoveryResponse {
    ipv4: Option<String>,
    ipv6: Option<String>,
}

impl DiscoveryResponse {
    /// Pick the preferred address: IPv4 first, IPv6 as fallback
    fn preferred(&self) -> Result<IpAddr> {
        let text = self
            .ipv4
            .as_deref()
            .or(self.ipv6.as_deref())
            .ok_or(Error::NoAddress)?;

        text.parse()
            .map_err(|_| Error::transport(format!("discovery returned an invalid address: {text}")))
    }
}

/// HTTP-based IP source
pub struct HttpIpSource {
    /// Discovery endpoint URL
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source asking `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::config("discovery endpoint url cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build http client: {e}")))?;

        Ok(Self { url, client })
    }

    /// Create a source asking the default discovery endpoint
    pub fn default_endpoint() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("discovery request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "discovery answered with status {status}"
            )));
        }

        let body: DiscoveryResponse = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("failed to decode discovery response: {e}")))?;

        let address = body.preferred()?;
        tracing::debug!(%address, "public address observed");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_is_preferred_over_ipv6() {
        let body = DiscoveryResponse {
            ipv4: Some("1.2.3.4".to_string()),
            ipv6: Some("::1".to_string()),
        };
        assert_eq!(body.preferred().unwrap(), IpAddr::from([1, 2, 3, 4]));
    }

    #[test]
    fn ipv6_is_the_fallback() {
        let body = DiscoveryResponse {
            ipv4: None,
            ipv6: Some("::1".to_string()),
        };
        assert_eq!(body.preferred().unwrap().to_string(), "::1");
    }

    #[test]
    fn no_address_at_all_is_an_error() {
        let body = DiscoveryResponse::default();
        assert!(matches!(body.preferred(), Err(Error::NoAddress)));
    }

    #[test]
    fn garbage_address_is_a_transport_error() {
        let body = DiscoveryResponse {
            ipv4: Some("not-an-address".to_string()),
            ipv6: None,
        };
        assert!(matches!(body.preferred(), Err(Error::Transport(_))));
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(matches!(HttpIpSource::new(""), Err(Error::Config(_))));
    }
}

// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the
// dyndns updater.
//
// The provider is stateless and single-shot: one API call per method, no
// retry, no backoff, no caching. Scheduling and error recovery are owned
// by the reconciler.
//
// ## Security Requirements
//
// - The API token NEVER appears in logs or `Debug` output
// - Requests carry a bounded timeout shorter than any sane poll interval
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dyndns_core::traits::{ADDRESS_RECORD_TYPE, DnsProvider, DnsRecord};
use dyndns_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "cloudflare";

/// Response envelope shared by the Cloudflare v4 endpoints we touch
#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default)]
    result: Vec<DnsRecord>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

impl ApiResponse {
    /// Join the API's error messages into one provider error message
    fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "api reported failure without a message".to_string();
        }
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Cloudflare DNS provider
///
/// Reads and overwrites one address record through the Cloudflare API v4,
/// authenticated with a bearer token.
pub struct CloudflareProvider {
    /// Cloudflare API token. Never log this value.
    api_token: String,

    /// Zone the managed record lives in
    zone_id: String,

    /// API base URL, overridable for tests
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// The Debug implementation intentionally does NOT expose the API token.
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permission
    /// - `zone_id`: Zone the managed record lives in
    ///
    /// Fails when the token or zone id is empty, or when the HTTP client
    /// cannot be constructed.
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        let zone_id = zone_id.into();

        if api_token.is_empty() {
            return Err(Error::config("cloudflare api token cannot be empty"));
        }
        if zone_id.is_empty() {
            return Err(Error::config("cloudflare zone id cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            api_token,
            zone_id,
            api_base: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Override the API base URL (tests, API-compatible gateways)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Look up the address record named `name`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn find_record(&self, name: &str) -> Result<DnsRecord> {
        tracing::debug!(record = name, "looking up dns record");

        let url = format!(
            "{}/zones/{}/dns_records?name={}",
            self.api_base, self.zone_id, name
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(format!("record lookup request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("record lookup answered with status {status}"),
            ));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("failed to decode lookup response: {e}")))?;

        if !body.success {
            return Err(Error::provider(PROVIDER_NAME, body.error_summary()));
        }

        // First match wins, in the order the API returned the entries.
        body.result
            .into_iter()
            .find(|record| record.matches(name))
            .ok_or_else(|| Error::record_not_found(name))
    }

    /// Overwrite the record's content with a new address
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    ///
    /// { "type": "A", "name": "example.com", "content": "1.2.3.4" }
    /// ```
    ///
    /// HTTP 200 is the only success status.
    async fn update_record(&self, record_id: &str, name: &str, content: &str) -> Result<()> {
        tracing::debug!(record = name, record_id, content, "updating dns record");

        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.api_base, self.zone_id, record_id
        );

        let payload = serde_json::json!({
            "type": ADDRESS_RECORD_TYPE,
            "name": name,
            "content": content,
        });

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::transport(format!("record update request failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("record update answered with status {status}"),
            ));
        }

        tracing::debug!(record = name, record_id, "dns record updated");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// # DNS Provider Trait
//
// Defines the interface for reading and overwriting the managed address
// record via a provider API.
//
// ## Implementations
//
// - Cloudflare: `dyndns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::DnsProvider;
//
// let provider = /* DnsProvider implementation */;
//
// let record = provider.find_record("home.example.com").await?;
// if record.content != discovered {
//     provider.update_record(&record.id, &record.name, &discovered).await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The record type managed by the updater
///
/// The updater deals exclusively in address records and always sends this
/// type on updates, matching what it filters for on lookups.
pub const ADDRESS_RECORD_TYPE: &str = "A";

/// A DNS record as the provider reports it
///
/// The record is a remote resource; this struct is a request-scoped
/// snapshot, not locally owned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record identifier
    pub id: String,

    /// Fully qualified record name
    pub name: String,

    /// Record type, e.g. "A"
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record content, a textual IPv4 or IPv6 address
    pub content: String,
}

impl DnsRecord {
    /// True when this entry is the address record named `name`
    pub fn matches(&self, name: &str) -> bool {
        self.name == name && self.record_type == ADDRESS_RECORD_TYPE
    }
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// They perform single-shot API calls and hold no state between requests;
/// scheduling and error recovery are owned by the reconciler.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the address record named `name`
    ///
    /// When the provider returns several entries, the first one whose name
    /// and type match wins. Implementations must preserve the provider's
    /// result ordering rather than reorder or disambiguate.
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The matching record
    /// - `Err(Error::RecordNotFound)`: No entry matched
    /// - `Err(Error::Provider)`: The API reported a failure or a bad status
    /// - `Err(Error::Transport)`: Network or decode failure
    async fn find_record(&self, name: &str) -> Result<DnsRecord, crate::Error>;

    /// Overwrite the content of the record identified by `record_id`
    ///
    /// Sets the record to the address-record type with the given content.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error::Provider)`: Non-success status from the API
    /// - `Err(Error::Transport)`: Network failure
    async fn update_record(
        &self,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

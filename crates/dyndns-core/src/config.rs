//! Runtime configuration for the updater
//!
//! Settings are loaded once at startup (the daemon maps CLI flags and
//! environment variables onto [`Settings`]) and stay immutable for the
//! lifetime of the process.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_interval_secs() -> u64 {
    300
}

/// Updater configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Cloudflare API token with permission to edit the zone's records
    pub api_token: String,

    /// Zone the managed record lives in
    pub zone_id: String,

    /// Fully qualified record name, e.g. "home.example.com"
    pub record: String,

    /// Seconds between reconciliation cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Verbose logging
    #[serde(default)]
    pub debug: bool,
}

impl Settings {
    /// Create settings with the default interval and quiet logging
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record: record.into(),
            interval_secs: default_interval_secs(),
            debug: false,
        }
    }

    /// Validate the configuration
    ///
    /// Reports the first missing required value, naming the flag and
    /// environment variable that supply it.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.is_empty() {
            return Err(crate::Error::config(
                "cloudflare api token is required \
                (--cloudflare-api-token or CLOUDFLARE_API_TOKEN)",
            ));
        }
        if self.zone_id.is_empty() {
            return Err(crate::Error::config(
                "cloudflare zone id is required \
                (--cloudflare-zone-id or CLOUDFLARE_ZONE_ID)",
            ));
        }
        if self.record.is_empty() {
            return Err(crate::Error::config(
                "cloudflare record name is required \
                (--cloudflare-record or CLOUDFLARE_RECORD)",
            ));
        }
        if self.interval_secs == 0 {
            return Err(crate::Error::config("sync interval must be > 0"));
        }
        Ok(())
    }

    /// The poll interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

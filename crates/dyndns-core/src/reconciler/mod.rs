//! The reconciliation engine
//!
//! One [`Reconciler`] owns the whole observe-compare-converge flow:
//!
//! ```text
//! ┌─────────────┐    find_record     ┌──────────────┐
//! │ DnsProvider │◄───────────────────│  Reconciler  │
//! │             │◄─ update_record ───│              │
//! └─────────────┘    (on diff only)  └──────────────┘
//!                                           │
//!                                           │ current
//!                                           ▼
//!                                    ┌─────────────┐
//!                                    │  IpSource   │
//!                                    └─────────────┘
//! ```
//!
//! Each call to [`Reconciler::sync`] is a fresh, fully sequential cycle:
//!
//! 1. Resolve the managed record (id and stored address) by name
//! 2. Discover the current public address
//! 3. Compare; equal content ends the cycle with no side effect
//! 4. Otherwise overwrite the record with the discovered address
//!
//! A failing step aborts the remainder of the cycle. The scheduling loop
//! in [`Reconciler::run`] logs the error and waits for the next tick;
//! there is no retry within a single cycle.

use crate::config::Settings;
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource};
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Outcome of a single reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record already held the discovered address; nothing was sent
    Unchanged {
        /// The address both sides agree on
        address: IpAddr,
    },

    /// The record was overwritten with the discovered address
    Updated {
        /// The content the record held before the update
        previous: String,
        /// The address that was written
        address: IpAddr,
    },
}

/// Drives reconciliation cycles against a provider and an IP source
///
/// The reconciler is constructed once at startup and handed to the
/// scheduling loop by value. It holds the only piece of cross-cycle
/// state, the cached record identifier, as an explicit field; the cache
/// is an optimization, not a correctness requirement, since the id is
/// re-derived from the lookup on every cycle.
pub struct Reconciler {
    /// DNS provider for reading and overwriting the managed record
    provider: Box<dyn DnsProvider>,

    /// Source of public IP observations
    ip_source: Box<dyn IpSource>,

    /// Name of the managed record
    record: String,

    /// Time between reconciliation cycles
    interval: Duration,

    /// Provider-assigned id of the managed record, cached for this run
    record_id: Option<String>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// Fails when the settings do not validate.
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        settings: &Settings,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            provider,
            ip_source,
            record: settings.record.clone(),
            interval: settings.interval(),
            record_id: None,
        })
    }

    /// Name of the managed record
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Run one reconciliation cycle
    ///
    /// Safe to call any number of times; calls have no required ordering
    /// relationship beyond non-overlap, which `&mut self` enforces.
    ///
    /// Side effects: at most one update call to the provider, only when
    /// the stored content differs from the discovered address.
    pub async fn sync(&mut self) -> Result<SyncOutcome> {
        let record = self.provider.find_record(&self.record).await?;
        if self.record_id.as_deref() != Some(record.id.as_str()) {
            self.record_id = Some(record.id.clone());
        }

        let address = self.ip_source.current().await?;

        if record.content == address.to_string() {
            debug!(record = %self.record, %address, "record is current");
            return Ok(SyncOutcome::Unchanged { address });
        }

        info!(
            provider = self.provider.provider_name(),
            record = %self.record,
            "update record: {} -> {}",
            record.content,
            address
        );
        let record_id = self.record_id.as_deref().unwrap_or(&record.id);
        self.provider
            .update_record(record_id, &record.name, &address.to_string())
            .await?;

        Ok(SyncOutcome::Updated {
            previous: record.content,
            address,
        })
    }

    /// Run the scheduling loop until `shutdown` fires
    ///
    /// Cycles run strictly one at a time: the next tick is only awaited
    /// after the current cycle completes, so overlapping sync attempts
    /// cannot occur. Cycle errors are logged and the loop keeps going.
    ///
    /// The shutdown signal aborts an in-flight cycle by dropping its
    /// future, which cancels the underlying HTTP call.
    pub async fn run(&mut self, mut shutdown: oneshot::Receiver<()>) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the caller already ran a
        // startup cycle, so consume it before entering the loop.
        ticker.tick().await;

        info!(interval = ?self.interval, record = %self.record, "ip sync scheduled");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = tokio::select! {
                        result = self.sync() => result,
                        _ = &mut shutdown => break,
                    };
                    match result {
                        Ok(SyncOutcome::Updated { previous, address }) => {
                            info!(record = %self.record, "record updated: {previous} -> {address}");
                        }
                        Ok(SyncOutcome::Unchanged { address }) => {
                            debug!(record = %self.record, %address, "no change");
                        }
                        Err(e) => {
                            error!("sync: {e}");
                        }
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        info!("interrupt signal, sync loop stopped");
        Ok(())
    }
}

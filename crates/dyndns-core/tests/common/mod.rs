//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles implement the two seam traits with scripted responses and
//! atomic call counters, so tests can assert exactly which remote calls a
//! cycle performed without any real networking. All interior state is
//! shared through `Arc`, so a double can be handed to the reconciler by
//! value while the test keeps a handle via [`ScriptedProvider::share`].

use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{ADDRESS_RECORD_TYPE, DnsProvider, DnsRecord, IpSource};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Settings for a single managed record with a short interval
pub fn test_settings(record: &str) -> dyndns_core::Settings {
    let mut settings = dyndns_core::Settings::new("test-token", "zone-1", record);
    settings.interval_secs = 1;
    settings
}

/// Convenience constructor for an address record
pub fn address_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: ADDRESS_RECORD_TYPE.to_string(),
        content: content.to_string(),
    }
}

/// What a scripted lookup should produce
pub enum LookupScript {
    /// Return this record
    Record(DnsRecord),
    /// Pretend no entry matched
    NotFound,
    /// Pretend the API reported a failure
    ProviderFailure,
}

/// One recorded update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub record_id: String,
    pub name: String,
    pub content: String,
}

/// A DnsProvider double with a scripted lookup and a recorded update log
pub struct ScriptedProvider {
    lookup: Arc<Mutex<LookupScript>>,
    fail_updates: Arc<AtomicBool>,
    find_calls: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<UpdateCall>>>,
}

impl ScriptedProvider {
    pub fn new(script: LookupScript) -> Self {
        Self {
            lookup: Arc::new(Mutex::new(script)),
            fail_updates: Arc::new(AtomicBool::new(false)),
            find_calls: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a second handle sharing all scripted state and counters
    pub fn share(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            fail_updates: Arc::clone(&self.fail_updates),
            find_calls: Arc::clone(&self.find_calls),
            updates: Arc::clone(&self.updates),
        }
    }

    /// Replace the lookup script for subsequent cycles
    pub fn set_lookup(&self, script: LookupScript) {
        *self.lookup.lock().unwrap() = script;
    }

    /// Make every update call fail with a provider error
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Handle onto the find_record() call counter
    pub fn find_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.find_calls)
    }

    /// Handle onto the recorded update calls
    pub fn update_log(&self) -> Arc<Mutex<Vec<UpdateCall>>> {
        Arc::clone(&self.updates)
    }
}

#[async_trait::async_trait]
impl DnsProvider for ScriptedProvider {
    async fn find_record(&self, name: &str) -> Result<DnsRecord> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.lookup.lock().unwrap() {
            LookupScript::Record(record) => Ok(record.clone()),
            LookupScript::NotFound => Err(Error::record_not_found(name)),
            LookupScript::ProviderFailure => Err(Error::provider("scripted", "lookup failed")),
        }
    }

    async fn update_record(&self, record_id: &str, name: &str, content: &str) -> Result<()> {
        self.updates.lock().unwrap().push(UpdateCall {
            record_id: record_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        });

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::provider("scripted", "update failed"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// An IpSource double returning a fixed address (or a scripted failure)
pub struct StaticIpSource {
    address: Arc<Mutex<IpAddr>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(address: IpAddr) -> Self {
        Self {
            address: Arc::new(Mutex::new(address)),
            fail: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every observation fail with a transport error
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Handle onto the current() call counter
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::transport("scripted discovery failure"));
        }
        Ok(*self.address.lock().unwrap())
    }
}

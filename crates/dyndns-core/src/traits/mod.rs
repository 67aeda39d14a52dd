//! Core traits for the updater
//!
//! These are the two seams between the reconciler and the outside world:
//!
//! - [`DnsProvider`]: Read and overwrite the managed address record
//! - [`IpSource`]: Discover the current public IP address

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{ADDRESS_RECORD_TYPE, DnsProvider, DnsRecord};
pub use ip_source::IpSource;

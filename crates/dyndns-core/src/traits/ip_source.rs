// # IP Source Trait
//
// Defines the interface for discovering the current public IP address.
//
// ## Implementations
//
// - HTTP discovery service: `dyndns-ip-http` crate

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Discover the current public IP address
    ///
    /// Called once per reconciliation cycle. Implementations must return a
    /// fresh observation every time; the reconciler never caches addresses
    /// between cycles.
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public address, IPv4 preferred
    /// - `Err(Error::NoAddress)`: The source offered no address at all
    /// - `Err(Error::Transport)`: Network or decode failure
    async fn current(&self) -> Result<IpAddr, crate::Error>;
}

//! Session store backend implementations.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::RedisBackend;

/// Key read by the default health probe. Never written.
pub const HEALTH_PROBE_KEY: &str = "moviestore:health";

/// Trait for session key-value store implementations.
///
/// The store is opaque get/set/delete by key; persistence and eviction are
/// the backend's own business.
///
/// All methods take `&self`. Implementations use interior mutability or
/// external storage, and are cloned cheaply into every request handler.
///
/// Futures are `Send` so the store can be used from generic axum handlers.
/// Implementors may write `async fn` directly.
pub trait SessionBackend: Send + Sync + Clone {
    /// Retrieve value by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found
    /// - `Ok(None)` - Key not found
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs (connection lost, etc.)
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Store value with optional TTL.
    ///
    /// `ttl = None` keeps the entry until deleted (or the backend default).
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove value. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if key exists.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send {
        async move { Ok(self.get(key).await?.is_some()) }
    }

    /// Health check - verify backend is accessible.
    ///
    /// Reported by `/healthz`. The default probes with a read of a reserved key.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    fn health_check(&self) -> impl Future<Output = Result<bool>> + Send {
        async move { self.get(HEALTH_PROBE_KEY).await.map(|_| true) }
    }
}

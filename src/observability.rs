//! Metrics hooks and TTL policy for the movie store.
//!
//! Two concerns live here:
//!
//! - **Metrics (`StoreMetrics`)**: catalog population outcomes and stored
//!   cart hits, misses and errors
//! - **TTL Policies (`TtlPolicy`)**: how long a stored cart outlives the last
//!   write to it
//!
//! Implement `StoreMetrics` to forward events to a monitoring system:
//!
//! ```ignore
//! use moviestore::observability::StoreMetrics;
//!
//! struct PrometheusMetrics;
//!
//! impl StoreMetrics for PrometheusMetrics {
//!     fn record_cart_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("cart_hits").inc();
//!     }
//! }
//!
//! let catalog = CatalogCache::new(provider).with_metrics(Arc::new(PrometheusMetrics));
//! ```
//!
//! `LogMetrics` uses the default methods, which write to the `log` crate.
//! Components default to `NoOpMetrics`.

use crate::catalog::PopulateOutcome;
use std::time::Duration;

/// Trait for movie store metrics collection.
pub trait StoreMetrics: Send + Sync {
    /// Record the result of one catalog population attempt.
    fn record_population(&self, outcome: &PopulateOutcome, duration: Duration) {
        if outcome.is_populated() {
            info!("Catalog population: {} took {:?}", outcome, duration);
        } else {
            warn!("Catalog population: {} took {:?}", outcome, duration);
        }
    }

    /// Record a stored cart found for a session.
    fn record_cart_hit(&self, key: &str, duration: Duration) {
        debug!("Cart HIT: {} took {:?}", key, duration);
    }

    /// Record a session with no stored cart.
    fn record_cart_miss(&self, key: &str, duration: Duration) {
        debug!("Cart MISS: {} took {:?}", key, duration);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Store ERROR for {}: {}", key, error);
    }
}

/// Metrics implementation that only logs.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl StoreMetrics for LogMetrics {}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl StoreMetrics for NoOpMetrics {
    fn record_population(&self, _outcome: &PopulateOutcome, _duration: Duration) {}
    fn record_cart_hit(&self, _key: &str, _duration: Duration) {}
    fn record_cart_miss(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// TTL (Time-to-Live) policy for stored carts.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TtlPolicy {
    /// Use backend's default TTL
    #[default]
    Default,

    /// Fixed duration, refreshed on every write
    Fixed(Duration),

    /// No TTL (carts live until cleared)
    Infinite,
}

impl TtlPolicy {
    /// TTL to pass to the backend on write.
    pub fn get_ttl(&self) -> Option<Duration> {
        match self {
            TtlPolicy::Default => None,
            TtlPolicy::Fixed(d) => Some(*d),
            TtlPolicy::Infinite => None,
        }
    }
}

//! Cart persistence on top of a session backend.

use super::MovieCart;
use crate::backend::SessionBackend;
use crate::entity::SessionEntity;
use crate::error::{Error, Result};
use crate::key::StoreKeyBuilder;
use crate::observability::{NoOpMetrics, StoreMetrics, TtlPolicy};
use crate::session::SessionId;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Reads, writes and deletes the per-session [`MovieCart`].
///
/// Cheap to clone; clones share the backend and the per-session locks.
///
/// [`CartStore::add`] serializes read-modify-write cycles for one session
/// within this process. Two replicas writing the same session through a
/// shared backend can still overwrite each other.
pub struct CartStore<B: SessionBackend> {
    backend: B,
    ttl_policy: TtlPolicy,
    metrics: Arc<dyn StoreMetrics>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl<B: SessionBackend> Clone for CartStore<B> {
    fn clone(&self) -> Self {
        CartStore {
            backend: self.backend.clone(),
            ttl_policy: self.ttl_policy.clone(),
            metrics: Arc::clone(&self.metrics),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<B: SessionBackend> CartStore<B> {
    pub fn new(backend: B) -> Self {
        CartStore {
            backend,
            ttl_policy: TtlPolicy::default(),
            metrics: Arc::new(NoOpMetrics),
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Set custom TTL policy.
    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the stored cart for a session.
    ///
    /// A missing cart is `Ok(None)`. An entry that is corrupted, from another
    /// schema version, or fails validation is deleted and reported as absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::BackendError` if the session store is unreachable.
    pub async fn load(&self, session: &SessionId) -> Result<Option<MovieCart>> {
        let key = StoreKeyBuilder::build::<MovieCart>(session);
        let timer = Instant::now();

        let bytes = match self.backend.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.metrics.record_cart_miss(&key, timer.elapsed());
                return Ok(None);
            }
            Err(e) => {
                self.metrics.record_error(&key, &e.to_string());
                return Err(e);
            }
        };

        let decoded = MovieCart::deserialize_from_store(&bytes)
            .and_then(|cart| cart.validate().map(|_| cart));

        match decoded {
            Ok(cart) => {
                self.metrics.record_cart_hit(&key, timer.elapsed());
                Ok(Some(cart))
            }
            Err(
                e @ (Error::DeserializationError(_)
                | Error::InvalidStoreEntry(_)
                | Error::VersionMismatch { .. }
                | Error::ValidationError(_)),
            ) => {
                warn!("⚠ Discarding unreadable cart at {}: {}", key, e);
                self.metrics.record_error(&key, &e.to_string());
                self.backend.delete(&key).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist a cart, refreshing its TTL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if serialization or the backend write fails.
    pub async fn save(&self, session: &SessionId, cart: &MovieCart) -> Result<()> {
        let key = StoreKeyBuilder::build::<MovieCart>(session);
        let bytes = cart.serialize_for_store()?;
        self.backend
            .set(&key, bytes, self.ttl_policy.get_ttl())
            .await
    }

    /// Add units of a movie to the session's cart and persist it.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: `quantity` is zero
    /// - `Error::BackendError`: the session store read or write fails
    pub async fn add(&self, session: &SessionId, movie_id: &str, quantity: u32) -> Result<MovieCart> {
        if quantity == 0 {
            return Err(Error::ValidationError(
                "quantity must be at least 1".to_string(),
            ));
        }

        let key = session.to_string();
        let lock = Arc::clone(self.locks.entry(key.clone()).or_default().value());

        let result = {
            let _guard = lock.lock().await;
            self.add_unlocked(session, movie_id, quantity).await
        };

        drop(lock);
        // Last holder out removes the entry; waiters keep it alive
        self.locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn add_unlocked(
        &self,
        session: &SessionId,
        movie_id: &str,
        quantity: u32,
    ) -> Result<MovieCart> {
        let mut cart = self.load(session).await?.unwrap_or_default();
        cart.add(movie_id, quantity);
        self.save(session, &cart).await?;
        debug!(
            "✓ Added {} x {} to cart {} ({} distinct)",
            quantity,
            movie_id,
            session,
            cart.len()
        );
        Ok(cart)
    }

    /// Delete the session's stored cart.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend delete fails.
    pub async fn clear(&self, session: &SessionId) -> Result<()> {
        let key = StoreKeyBuilder::build::<MovieCart>(session);
        self.backend.delete(&key).await
    }

    /// Whether the session store answers.
    pub async fn health_check(&self) -> bool {
        match self.backend.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!("Session store health check failed: {}", e);
                false
            }
        }
    }
}

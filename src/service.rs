//! High-level storefront service for web handlers.
//!
//! Composes the catalog cache and the cart store into the views the HTTP
//! layer serves. Cheap to clone: the catalog sits behind an `Arc` and the
//! cart store shares its backend.

use crate::backend::SessionBackend;
use crate::cart::{
    build_items, reconcile, CartItem, CartStore, CLEARED_QUANTITY, DEFAULT_QUANTITY,
};
use crate::catalog::{CatalogCache, CatalogProvider, Movie};
use crate::error::{Error, Result};
use crate::session::SessionId;
use serde::Serialize;
use std::sync::Arc;

/// Data handed to the view layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub movies: Vec<CartItem>,
    /// Present only when the session had a stored cart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_count: Option<usize>,
    pub hostname: String,
}

/// Storefront service.
///
/// # Example
///
/// ```ignore
/// use moviestore::{CartStore, CatalogCache, MovieStoreService, backend::InMemoryBackend};
///
/// let service = MovieStoreService::new(
///     CatalogCache::new(provider),
///     CartStore::new(InMemoryBackend::new()),
///     "web-1",
/// );
///
/// let view = service.home(&session).await;
/// ```
pub struct MovieStoreService<P: CatalogProvider, B: SessionBackend> {
    catalog: Arc<CatalogCache<P>>,
    carts: CartStore<B>,
    hostname: Arc<str>,
}

impl<P: CatalogProvider, B: SessionBackend> Clone for MovieStoreService<P, B> {
    fn clone(&self) -> Self {
        MovieStoreService {
            catalog: Arc::clone(&self.catalog),
            carts: self.carts.clone(),
            hostname: Arc::clone(&self.hostname),
        }
    }
}

impl<P: CatalogProvider, B: SessionBackend> MovieStoreService<P, B> {
    pub fn new(catalog: CatalogCache<P>, carts: CartStore<B>, hostname: impl Into<String>) -> Self {
        MovieStoreService {
            catalog: Arc::new(catalog),
            carts,
            hostname: Arc::from(hostname.into()),
        }
    }

    pub fn catalog(&self) -> &CatalogCache<P> {
        &self.catalog
    }

    pub fn carts(&self) -> &CartStore<B> {
        &self.carts
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Catalog with the session's stored quantities overlaid.
    ///
    /// A session store failure is logged and rendered as a new session.
    pub async fn home(&self, session: &SessionId) -> HomeView {
        info!("Request served by HOST {}", self.hostname);

        let items = build_items(self.catalog.get_all().await, DEFAULT_QUANTITY);

        let stored = match self.carts.load(session).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to read stored cart for session {}: {}", session, e);
                None
            }
        };

        if stored.is_none() {
            info!("New Session");
        }

        let reconciled = reconcile(items, stored.as_ref());

        HomeView {
            movies: reconciled.items,
            cart_count: stored.map(|_| reconciled.cart_count),
            hostname: self.hostname.to_string(),
        }
    }

    /// Catalog with every quantity at zero; deletes the stored cart.
    ///
    /// Issues exactly one delete against the session store, whether or not
    /// a cart was stored.
    pub async fn clear_cart(&self, session: &SessionId) -> HomeView {
        info!("Request served by HOST {}", self.hostname);

        let items = build_items(self.catalog.get_all().await, CLEARED_QUANTITY);

        if let Err(e) = self.carts.clear(session).await {
            warn!("Failed to delete stored cart for session {}: {}", session, e);
        }

        info!("New Session");
        HomeView {
            movies: items,
            cart_count: None,
            hostname: self.hostname.to_string(),
        }
    }

    /// Add units of a catalog movie to the session's cart.
    ///
    /// Returns the number of distinct movies now in the cart.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: `quantity` is zero
    /// - `Error::NotFound`: the movie is not in the catalog
    /// - `Error::BackendError`: the session store failed
    pub async fn add_to_cart(
        &self,
        session: &SessionId,
        movie_id: &str,
        quantity: u32,
    ) -> Result<usize> {
        if quantity == 0 {
            return Err(Error::ValidationError(
                "quantity must be at least 1".to_string(),
            ));
        }

        self.catalog.populate().await;
        if self.catalog.lookup(movie_id).is_none() {
            return Err(Error::NotFound(movie_id.to_string()));
        }

        let cart = self.carts.add(session, movie_id, quantity).await?;
        Ok(cart.len())
    }

    /// Single catalog record. Does not populate the catalog.
    pub fn movie(&self, id: &str) -> Option<Movie> {
        self.catalog.lookup(id)
    }

    /// Whether the session store answers.
    pub async fn store_healthy(&self) -> bool {
        self.carts.health_check().await
    }
}

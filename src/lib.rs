//! # moviestore
//!
//! A small movie storefront: a catalog of popular movies fetched once from an
//! upstream movie API and cached in process, plus a per-session shopping cart
//! kept in a session store.
//!
//! ## Features
//!
//! - **Lazy catalog:** the first request fills [`CatalogCache`]; concurrent
//!   first requests share a single upstream fetch
//! - **Pluggable upstream:** any [`CatalogProvider`]; [`catalog::TmdbProvider`]
//!   talks to TMDB over HTTP
//! - **Session carts:** [`CartStore`] persists [`MovieCart`] in any
//!   [`SessionBackend`] (in-memory or Redis)
//! - **Versioned store entries:** stale or corrupt carts are evicted, never served
//!
//! ## Quick Start
//!
//! ```ignore
//! use moviestore::{
//!     backend::InMemoryBackend, catalog::TmdbProvider, CartStore, CatalogCache,
//!     MovieStoreService, SessionId, StoreConfig,
//! };
//!
//! let config = StoreConfig::from_env()?;
//! let catalog = CatalogCache::new(TmdbProvider::new(&config)?);
//! let carts = CartStore::new(InMemoryBackend::new());
//! let service = MovieStoreService::new(catalog, carts, config.hostname.clone());
//!
//! let view = service.home(&SessionId::generate()).await;
//! println!("{} movies, cart badge {:?}", view.movies.len(), view.cart_count);
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod key;
pub mod observability;
pub mod serialization;
pub mod service;
pub mod session;
pub mod web;

// Re-exports for convenience
pub use backend::SessionBackend;
pub use cart::{reconcile, CartItem, CartStore, MovieCart};
pub use catalog::{CatalogCache, CatalogProvider, Movie, PopulateOutcome};
pub use config::StoreConfig;
pub use entity::SessionEntity;
pub use error::{Error, Result};
pub use service::{HomeView, MovieStoreService};
pub use session::SessionId;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! In-process movie catalog, lazily populated from an upstream provider.
//!
//! [`CatalogCache`] owns the `id -> Movie` map for the life of the process.
//! The first read that finds the cache empty triggers a population; later
//! reads are served from memory. There is no invalidation or refresh.
//!
//! # Concurrency
//!
//! Population is serialized by an async mutex with the emptiness test
//! repeated under the lock, so concurrent first requests cause one upstream
//! call. The fetched records are assembled into a complete snapshot and
//! published in one step, so a reader sees either no catalog or all of it.
//! A failed or empty fetch publishes nothing and the next read tries again.
//!
//! # Failure handling
//!
//! [`CatalogCache::populate`] reports what happened as a [`PopulateOutcome`].
//! [`CatalogCache::get_all`] never fails; every failure degrades to an empty
//! catalog. Parsing is all-or-nothing: a malformed body inserts no records.

mod movie;
mod provider;
mod tmdb;

pub use movie::{
    random_price, ImageBase, ListedMovie, Movie, PopularListing, ProviderId, PRICE_RANGE,
};
pub use provider::{CatalogProvider, InMemoryProvider};
pub use tmdb::TmdbProvider;

use crate::error::Error;
use crate::observability::{NoOpMetrics, StoreMetrics};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OnceCell};

/// Result of one population attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum PopulateOutcome {
    /// The cache already held movies; the provider was not called.
    AlreadyPopulated,
    /// The provider answered with this many records, published together.
    Loaded(usize),
    /// The provider answered with a non-success status.
    UpstreamUnavailable(u16),
    /// The provider answered 200 with a body that did not parse.
    MalformedResponse(String),
    /// The request produced no response.
    TransportFailure(String),
}

impl PopulateOutcome {
    /// Whether the cache holds data after this attempt.
    pub fn is_populated(&self) -> bool {
        match self {
            PopulateOutcome::AlreadyPopulated => true,
            PopulateOutcome::Loaded(count) => *count > 0,
            _ => false,
        }
    }

    fn from_error(err: Error) -> Self {
        match err {
            Error::UpstreamUnavailable { status } => PopulateOutcome::UpstreamUnavailable(status),
            Error::MalformedResponse(msg) => PopulateOutcome::MalformedResponse(msg),
            other => PopulateOutcome::TransportFailure(other.to_string()),
        }
    }
}

impl fmt::Display for PopulateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulateOutcome::AlreadyPopulated => write!(f, "already populated"),
            PopulateOutcome::Loaded(count) => write!(f, "loaded {} movies", count),
            PopulateOutcome::UpstreamUnavailable(status) => {
                write!(f, "upstream unavailable (HTTP {})", status)
            }
            PopulateOutcome::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
            PopulateOutcome::TransportFailure(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

/// Immutable catalog contents, published in one step once fully built.
struct CatalogSnapshot {
    by_id: HashMap<String, Movie>,
    /// Same records as `by_id`, most popular first.
    ordered: Vec<Movie>,
}

impl CatalogSnapshot {
    fn build(movies: Vec<Movie>) -> Self {
        let by_id: HashMap<String, Movie> = movies
            .into_iter()
            .map(|movie| (movie.id.clone(), movie))
            .collect();

        let mut ordered: Vec<Movie> = by_id.values().cloned().collect();
        ordered.sort_by(|a, b| {
            b.popularity
                .total_cmp(&a.popularity)
                .then_with(|| a.id.cmp(&b.id))
        });

        CatalogSnapshot { by_id, ordered }
    }
}

/// Lazily populated movie catalog.
///
/// # Example
///
/// ```ignore
/// use moviestore::catalog::{CatalogCache, TmdbProvider};
///
/// let catalog = CatalogCache::new(TmdbProvider::new(&config)?);
/// let movies = catalog.get_all().await;   // first call fetches
/// let again = catalog.get_all().await;    // served from memory
/// ```
pub struct CatalogCache<P: CatalogProvider> {
    provider: P,
    snapshot: OnceCell<CatalogSnapshot>,
    populate_lock: Mutex<()>,
    metrics: Arc<dyn StoreMetrics>,
}

impl<P: CatalogProvider> CatalogCache<P> {
    /// Create an empty catalog backed by `provider`.
    pub fn new(provider: P) -> Self {
        CatalogCache {
            provider,
            snapshot: OnceCell::new(),
            populate_lock: Mutex::new(()),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The upstream provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Every cached movie, most popular first.
    ///
    /// Populates the cache if it is empty. Never fails: a failed population
    /// yields an empty vector.
    pub async fn get_all(&self) -> Vec<Movie> {
        if self.snapshot.initialized() {
            info!("Loading movies from cache");
        } else {
            self.populate().await;
        }

        let movies = self
            .snapshot
            .get()
            .map(|snapshot| snapshot.ordered.clone())
            .unwrap_or_default();

        info!("Loaded {} movies from cache", movies.len());
        movies
    }

    /// Direct read. Never triggers a population.
    pub fn lookup(&self, id: &str) -> Option<Movie> {
        self.snapshot.get()?.by_id.get(id).cloned()
    }

    /// Number of cached movies.
    pub fn len(&self) -> usize {
        self.snapshot.get().map_or(0, |snapshot| snapshot.by_id.len())
    }

    /// Whether the cache is empty (not yet populated, or every attempt failed).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch from the provider and fill the cache, if it is empty.
    ///
    /// Concurrent callers wait on one another; only the first to find the
    /// cache empty under the lock calls the provider. Readers never observe
    /// a partly filled catalog.
    pub async fn populate(&self) -> PopulateOutcome {
        if self.snapshot.initialized() {
            return PopulateOutcome::AlreadyPopulated;
        }

        let _guard = self.populate_lock.lock().await;

        if self.snapshot.initialized() {
            info!("Cache already loaded with movies ... will use cache");
            return PopulateOutcome::AlreadyPopulated;
        }

        info!("No movies exist in cache, loading cache ..");
        let timer = Instant::now();

        let outcome = match self.provider.fetch_popular().await {
            Ok(movies) if movies.is_empty() => {
                warn!("Provider returned no movies; catalog stays empty");
                PopulateOutcome::Loaded(0)
            }
            Ok(movies) => {
                let count = movies.len();
                if self.snapshot.set(CatalogSnapshot::build(movies)).is_err() {
                    // Only reachable if set outside the populate lock
                    warn!("Catalog was published concurrently; keeping the first copy");
                }
                PopulateOutcome::Loaded(count)
            }
            Err(e) => {
                error!("Error loading catalog: {}", e);
                self.metrics.record_error("catalog", &e.to_string());
                PopulateOutcome::from_error(e)
            }
        };

        self.metrics.record_population(&outcome, timer.elapsed());
        outcome
    }
}

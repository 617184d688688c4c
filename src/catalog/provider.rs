//! Catalog provider trait for abstracting the upstream movie API.
//!
//! `CatalogProvider` decouples the catalog cache from the HTTP client. The
//! production implementation is [`crate::catalog::TmdbProvider`]; [`InMemoryProvider`]
//! serves fixed records and scripted failures for tests.

use super::movie::Movie;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Trait for upstream catalog sources.
pub trait CatalogProvider: Send + Sync {
    /// Fetch the first page of popular movies.
    ///
    /// # Errors
    ///
    /// - `Error::UpstreamUnavailable`: provider answered with a non-success status
    /// - `Error::MalformedResponse`: body did not have the expected shape
    /// - `Error::TransportError`: no response at all
    fn fetch_popular(&self) -> impl Future<Output = Result<Vec<Movie>>> + Send;
}

/// In-memory provider for tests and local demos.
///
/// Serves a fixed list of movies. Failures queued with
/// [`InMemoryProvider::with_failures`] are returned first, one per call.
pub struct InMemoryProvider {
    movies: Vec<Movie>,
    failures: Mutex<VecDeque<Error>>,
    calls: AtomicUsize,
}

impl InMemoryProvider {
    /// Create a provider serving `movies`.
    pub fn new(movies: Vec<Movie>) -> Self {
        InMemoryProvider {
            movies,
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue errors to return before serving the movies.
    pub fn with_failures(self, failures: impl IntoIterator<Item = Error>) -> Self {
        let queued = failures.into_iter().collect();
        InMemoryProvider {
            failures: Mutex::new(queued),
            ..self
        }
    }

    /// Number of `fetch_popular` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<Error> {
        match self.failures.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        }
    }
}

impl CatalogProvider for InMemoryProvider {
    async fn fetch_popular(&self) -> Result<Vec<Movie>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.next_failure() {
            return Err(err);
        }

        Ok(self.movies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: format!("Movie {}", id),
            overview: String::new(),
            popularity: 1.0,
            poster_path: String::new(),
            logo_path: String::new(),
            price: 5.0,
        }
    }

    #[tokio::test]
    async fn test_in_memory_provider_serves_movies() {
        let provider = InMemoryProvider::new(vec![movie("1"), movie("2")]);

        let movies = provider.fetch_popular().await.expect("Failed to fetch");
        assert_eq!(movies.len(), 2);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_provider_scripted_failures() {
        let provider = InMemoryProvider::new(vec![movie("1")])
            .with_failures([Error::UpstreamUnavailable { status: 503 }]);

        let first = provider.fetch_popular().await;
        assert!(matches!(
            first,
            Err(Error::UpstreamUnavailable { status: 503 })
        ));

        let second = provider.fetch_popular().await.expect("Failed to fetch");
        assert_eq!(second.len(), 1);
        assert_eq!(provider.calls(), 2);
    }
}

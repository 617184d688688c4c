//! HTTP catalog provider for TMDB-compatible movie APIs.

use super::movie::{ImageBase, Movie, PopularListing};
use super::provider::CatalogProvider;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use reqwest::{Client, StatusCode, Url};

/// Path of the popular-movies listing, relative to the API endpoint.
const POPULAR_PATH: &str = "/movie/popular";

/// Provider calling `GET {endpoint}/movie/popular?api_key={key}`.
pub struct TmdbProvider {
    client: Client,
    endpoint_url: String,
    api_key: String,
    images: ImageBase,
}

impl TmdbProvider {
    /// Create a provider from the store configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the HTTP client cannot be built or the
    /// endpoint URL does not parse.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let provider = TmdbProvider {
            client,
            endpoint_url: config.api_endpoint_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            images: config.images.clone(),
        };

        // Fail at startup rather than on the first visitor
        provider.popular_url()?;
        Ok(provider)
    }

    /// Full listing URL, credential included.
    pub fn popular_url(&self) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}{}", self.endpoint_url, POPULAR_PATH),
            &[("api_key", self.api_key.as_str())],
        )
        .map_err(|e| {
            Error::ConfigError(format!(
                "Invalid API endpoint URL {}: {}",
                self.endpoint_url, e
            ))
        })
    }
}

impl CatalogProvider for TmdbProvider {
    async fn fetch_popular(&self) -> Result<Vec<Movie>> {
        let url = self.popular_url()?;
        info!("Request URI: {}{}", self.endpoint_url, POPULAR_PATH);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        info!("Response Status: {}", status);

        if status != StatusCode::OK {
            return Err(Error::UpstreamUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let listing: PopularListing = serde_json::from_str(&body)?;

        let movies: Vec<Movie> = listing
            .results
            .into_iter()
            .map(|listed| listed.into_movie(&self.images))
            .collect();

        debug!("Got {} movies", movies.len());
        Ok(movies)
    }
}

impl std::fmt::Debug for TmdbProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbProvider")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

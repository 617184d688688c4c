//! Runtime configuration.
//!
//! Loaded from environment variables with defaults suitable for a local demo.

use crate::catalog::ImageBase;
use crate::error::{Error, Result};
use crate::observability::TtlPolicy;
use std::str::FromStr;
use std::time::Duration;

/// Default upstream movie API endpoint.
pub const DEFAULT_API_ENDPOINT_URL: &str = "https://api.themoviedb.org/3";

/// Default base for poster thumbnails.
pub const DEFAULT_POSTER_BASE_URL: &str = "http://image.tmdb.org/t/p/w92";

/// Default base for the small logo image.
pub const DEFAULT_LOGO_BASE_URL: &str = "http://image.tmdb.org/t/p/w45";

/// Default Redis connection pool size.
pub const DEFAULT_REDIS_POOL_SIZE: usize = 16;

/// Host identity reported when `HOSTNAME` is not set.
pub const UNKNOWN_HOST: &str = "unknown";

/// Movie store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Upstream API base, without the `/movie/popular` suffix.
    pub api_endpoint_url: String,

    /// Credential sent as the `api_key` query parameter.
    pub api_key: String,

    /// Image URL bases prepended to the provider's relative poster path.
    pub images: ImageBase,

    /// Upstream request timeout.
    pub http_timeout: Duration,

    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Redis URL for the session store. `None` selects the in-memory store.
    pub redis_url: Option<String>,

    /// Maximum pooled Redis connections.
    pub redis_pool_size: usize,

    /// Lifetime of a stored cart after its last write. Zero disables expiry.
    pub session_ttl: Duration,

    /// Serving host identity, passed through to the view.
    pub hostname: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            api_endpoint_url: DEFAULT_API_ENDPOINT_URL.to_string(),
            api_key: String::new(),
            images: ImageBase::default(),
            http_timeout: Duration::from_secs(10),
            bind_addr: "0.0.0.0:8080".to_string(),
            redis_url: None,
            redis_pool_size: DEFAULT_REDIS_POOL_SIZE,
            session_ttl: Duration::from_secs(1800),
            hostname: UNKNOWN_HOST.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MOVIESTORE_API_ENDPOINT_URL`: upstream base (default: TMDB v3)
    /// - `MOVIESTORE_API_KEY`: upstream credential (default: empty)
    /// - `MOVIESTORE_POSTER_BASE_URL`, `MOVIESTORE_LOGO_BASE_URL`: image bases
    /// - `MOVIESTORE_HTTP_TIMEOUT_SECS`: upstream timeout (default: 10)
    /// - `MOVIESTORE_BIND_ADDR`: listen address (default: 0.0.0.0:8080)
    /// - `MOVIESTORE_REDIS_URL`: session store URL (default: in-memory)
    /// - `MOVIESTORE_REDIS_POOL_SIZE`: Redis pool size (default: 16)
    /// - `MOVIESTORE_SESSION_TTL_SECS`: cart lifetime (default: 1800, 0 = never expire)
    /// - `HOSTNAME`: host identity (default: "unknown")
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StoreConfig::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_timeout_secs: u64 = parse_var(&lookup, "MOVIESTORE_HTTP_TIMEOUT_SECS")?
            .unwrap_or(defaults.http_timeout.as_secs());
        let redis_pool_size: usize = parse_var(&lookup, "MOVIESTORE_REDIS_POOL_SIZE")?
            .unwrap_or(defaults.redis_pool_size);
        let session_ttl_secs: u64 = parse_var(&lookup, "MOVIESTORE_SESSION_TTL_SECS")?
            .unwrap_or(defaults.session_ttl.as_secs());

        Ok(StoreConfig {
            api_endpoint_url: non_empty("MOVIESTORE_API_ENDPOINT_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_endpoint_url),
            api_key: lookup("MOVIESTORE_API_KEY").unwrap_or_default(),
            images: ImageBase {
                poster: non_empty("MOVIESTORE_POSTER_BASE_URL").unwrap_or(defaults.images.poster),
                logo: non_empty("MOVIESTORE_LOGO_BASE_URL").unwrap_or(defaults.images.logo),
            },
            http_timeout: Duration::from_secs(http_timeout_secs),
            bind_addr: non_empty("MOVIESTORE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            redis_url: non_empty("MOVIESTORE_REDIS_URL"),
            redis_pool_size,
            session_ttl: Duration::from_secs(session_ttl_secs),
            hostname: non_empty("HOSTNAME").unwrap_or(defaults.hostname),
        })
    }

    /// TTL policy applied to stored carts.
    pub fn session_ttl_policy(&self) -> TtlPolicy {
        if self.session_ttl.is_zero() {
            TtlPolicy::Infinite
        } else {
            TtlPolicy::Fixed(self.session_ttl)
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::ConfigError(format!("{}={:?}: {}", name, raw, e))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = StoreConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.api_endpoint_url, DEFAULT_API_ENDPOINT_URL);
        assert_eq!(config.images.poster, DEFAULT_POSTER_BASE_URL);
        assert_eq!(config.images.logo, DEFAULT_LOGO_BASE_URL);
        assert_eq!(config.hostname, UNKNOWN_HOST);
        assert!(config.redis_url.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.redis_pool_size, DEFAULT_REDIS_POOL_SIZE);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("MOVIESTORE_API_ENDPOINT_URL", "http://localhost:9000/3/"),
            ("MOVIESTORE_API_KEY", "k3y"),
            ("MOVIESTORE_HTTP_TIMEOUT_SECS", "3"),
            ("MOVIESTORE_REDIS_URL", "redis://cache:6379/1"),
            ("MOVIESTORE_REDIS_POOL_SIZE", "4"),
            ("HOSTNAME", "moviestore-7f9c"),
        ]))
        .unwrap();

        assert_eq!(config.api_endpoint_url, "http://localhost:9000/3");
        assert_eq!(config.api_key, "k3y");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/1"));
        assert_eq!(config.redis_pool_size, 4);
        assert_eq!(config.hostname, "moviestore-7f9c");
    }

    #[test]
    fn test_empty_hostname_falls_back_to_unknown() {
        let config = StoreConfig::from_lookup(lookup_from(&[("HOSTNAME", "")])).unwrap();
        assert_eq!(config.hostname, UNKNOWN_HOST);
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result =
            StoreConfig::from_lookup(lookup_from(&[("MOVIESTORE_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_session_ttl_policy() {
        let config = StoreConfig::default();
        assert_eq!(
            config.session_ttl_policy(),
            TtlPolicy::Fixed(Duration::from_secs(1800))
        );

        let config =
            StoreConfig::from_lookup(lookup_from(&[("MOVIESTORE_SESSION_TTL_SECS", "0")])).unwrap();
        assert_eq!(config.session_ttl_policy(), TtlPolicy::Infinite);
    }
}

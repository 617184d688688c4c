//! Movie records and the upstream listing they are built from.

use crate::config::{DEFAULT_LOGO_BASE_URL, DEFAULT_POSTER_BASE_URL};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Range;

/// Range the placeholder price is drawn from at ingest.
pub const PRICE_RANGE: Range<f64> = 1.0..10.0;

/// A catalog entry. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub overview: String,
    pub popularity: f64,
    /// Absolute poster thumbnail URL.
    pub poster_path: String,
    /// Absolute logo URL.
    pub logo_path: String,
    /// Placeholder price, not backed by any pricing source.
    pub price: f64,
}

/// URL bases prepended to the provider's relative `poster_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBase {
    pub poster: String,
    pub logo: String,
}

impl Default for ImageBase {
    fn default() -> Self {
        ImageBase {
            poster: DEFAULT_POSTER_BASE_URL.to_string(),
            logo: DEFAULT_LOGO_BASE_URL.to_string(),
        }
    }
}

/// Body of the provider's "popular movies" listing.
///
/// Only the first page is ever requested.
#[derive(Debug, Deserialize)]
pub struct PopularListing {
    pub results: Vec<ListedMovie>,
}

/// Provider identifiers arrive as JSON numbers; some mirrors send strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Number(n) => write!(f, "{}", n),
            ProviderId::Text(s) => f.write_str(s),
        }
    }
}

/// One element of `results`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListedMovie {
    pub id: ProviderId,
    pub title: String,
    pub overview: String,
    /// Ranking only; an unusable value sorts as `0.0` instead of failing the listing.
    #[serde(default, deserialize_with = "lenient_popularity")]
    pub popularity: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Accepts a number or a numeric string. Anything else reads as `0.0`.
fn lenient_popularity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|p| p.is_finite()).unwrap_or(0.0))
}

impl ListedMovie {
    /// Build the catalog record, assigning a random price.
    pub fn into_movie(self, images: &ImageBase) -> Movie {
        let poster = self.poster_path.unwrap_or_default();

        Movie {
            id: self.id.to_string(),
            title: self.title,
            overview: self.overview,
            popularity: self.popularity,
            poster_path: format!("{}{}", images.poster, poster),
            logo_path: format!("{}{}", images.logo, poster),
            price: random_price(),
        }
    }
}

/// Uniform draw from [`PRICE_RANGE`].
pub fn random_price() -> f64 {
    rand::rng().random_range(PRICE_RANGE)
}

//! Error types for the movie store.

use std::fmt;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the movie store.
///
/// Catalog population never surfaces these to a visitor; they are mapped to
/// [`crate::catalog::PopulateOutcome`] and degraded to an empty catalog.
/// Session store failures degrade to an empty cart.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a stored entity to bytes.
    SerializationError(String),

    /// Deserialization failed when converting stored bytes to an entity.
    ///
    /// **Recovery:** The stored entry is evicted and treated as absent.
    DeserializationError(String),

    /// A stored entity or request failed validation.
    ///
    /// Raised for carts holding a zero quantity and for add-to-cart
    /// requests asking for zero units.
    ValidationError(String),

    /// Invalid stored entry: corrupted envelope or bad magic.
    ///
    /// Returned when the magic header is not `b"MVST"`.
    InvalidStoreEntry(String),

    /// Schema version mismatch between code and stored data.
    ///
    /// **Recovery:** The stored entry is evicted; the visitor starts a new cart.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from stored entry)
        found: u32,
    },

    /// Session store error (Redis connection lost, protocol error, ...).
    BackendError(String),

    /// The catalog provider answered with a non-success status.
    UpstreamUnavailable {
        /// HTTP status returned by the provider
        status: u16,
    },

    /// The catalog provider answered 200 but the body did not have the
    /// expected `{ "results": [...] }` shape.
    MalformedResponse(String),

    /// The request to the catalog provider never produced a response
    /// (connection refused, timeout, TLS failure).
    TransportError(String),

    /// A movie identifier was not found in the catalog.
    NotFound(String),

    /// Configuration error during startup.
    ///
    /// Common causes:
    /// - Non-numeric value in a numeric `MOVIESTORE_*` variable
    /// - Unparseable upstream endpoint URL
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::InvalidStoreEntry(msg) => write!(f, "Invalid store entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Store version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::UpstreamUnavailable { status } => {
                write!(f, "Catalog provider unavailable: HTTP {}", status)
            }
            Error::MalformedResponse(msg) => write!(f, "Malformed catalog response: {}", msg),
            Error::TransportError(msg) => write!(f, "Transport error: {}", msg),
            Error::NotFound(id) => write!(f, "Movie not found: {}", id),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::TransportError(e.to_string())
        } else {
            Error::MalformedResponse(e.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::MalformedResponse(e.to_string())
        } else {
            Error::TransportError(e.to_string())
        }
    }
}

//! Trait for values persisted in the session store.

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Trait that all values stored in the session store must implement.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use moviestore::SessionEntity;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Wishlist {
///     pub movie_ids: Vec<String>,
/// }
///
/// impl SessionEntity for Wishlist {
///     fn store_prefix() -> &'static str {
///         "wishlist"
///     }
/// }
/// ```
pub trait SessionEntity: Send + Sync + Serialize + DeserializeOwned + Clone {
    /// Namespace for this value type.
    ///
    /// Final store key format: `"{prefix}:{session_id}"`
    fn store_prefix() -> &'static str;

    /// Serialize for session store storage.
    ///
    /// See `crate::serialization` for the envelope format.
    fn serialize_for_store(&self) -> Result<Vec<u8>> {
        crate::serialization::serialize_for_store(self)
    }

    /// Deserialize from session store bytes, validating magic and version.
    fn deserialize_from_store(bytes: &[u8]) -> Result<Self> {
        crate::serialization::deserialize_from_store(bytes)
    }

    /// Optional: Validate the value after deserialization.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

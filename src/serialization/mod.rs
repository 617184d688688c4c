//! Postcard-based serialization with versioned envelopes for session store entries.
//!
//! Every value written to the session store follows this format:
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│ VERSION (varint)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "MVST"              u32                postcard::to_allocvec(T)
//! ```
//!
//! An entry with the wrong magic or an older schema version is rejected; the
//! cart store evicts it and the visitor starts a fresh cart.
//!
//! # Example
//!
//! ```rust
//! use moviestore::serialization::{serialize_for_store, deserialize_from_store};
//! use std::collections::HashMap;
//!
//! # fn main() -> moviestore::Result<()> {
//! let mut items = HashMap::new();
//! items.insert("550".to_string(), 2u32);
//!
//! let bytes = serialize_for_store(&items)?;
//! let decoded: HashMap<String, u32> = deserialize_from_store(&bytes)?;
//! assert_eq!(items, decoded);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for movie store entries: b"MVST"
pub const STORE_MAGIC: [u8; 4] = *b"MVST";

/// Current schema version.
///
/// Increment when a stored type changes shape (fields added, removed,
/// reordered or retyped). Entries written by an older version are evicted.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for session store entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoreEnvelope<T> {
    /// Magic header: must be b"MVST"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The stored data
    pub payload: T,
}

impl<T> StoreEnvelope<T> {
    /// Create a new envelope with current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: STORE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for session store storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_for_store<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = StoreEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Store serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from session store bytes with validation.
///
/// # Errors
///
/// - `Error::DeserializationError`: Corrupted Postcard payload
/// - `Error::InvalidStoreEntry`: Invalid magic header
/// - `Error::VersionMismatch`: Schema version mismatch
pub fn deserialize_from_store<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: StoreEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        error!("Store deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != STORE_MAGIC {
        warn!(
            "Invalid store entry: expected magic {:?}, got {:?}",
            STORE_MAGIC, envelope.magic
        );
        return Err(Error::InvalidStoreEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            STORE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Store version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}

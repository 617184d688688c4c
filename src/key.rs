//! Session store key construction.

use crate::entity::SessionEntity;
use std::fmt::Display;

/// Builder for session store keys.
pub struct StoreKeyBuilder;

impl StoreKeyBuilder {
    /// Build the store key for a value type and session.
    ///
    /// `MovieCart` for session `abc` lives at `movie-cart:abc`.
    pub fn build<T: SessionEntity>(session: &dyn Display) -> String {
        Self::build_composite(&[T::store_prefix(), &session.to_string()])
    }

    /// Build composite key from multiple parts.
    pub fn build_composite(parts: &[&str]) -> String {
        parts.join(":")
    }
}

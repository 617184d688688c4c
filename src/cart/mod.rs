//! Shopping cart: stored per-session quantities and their overlay onto the
//! catalog view.

mod store;

pub use store::CartStore;

use crate::catalog::Movie;
use crate::entity::SessionEntity;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quantity shown for a catalog entry the visitor has not put in the cart.
pub const DEFAULT_QUANTITY: u32 = 1;

/// Quantity shown for every entry right after the cart is cleared.
pub const CLEARED_QUANTITY: u32 = 0;

/// Per-session cart as persisted in the session store.
///
/// Maps movie identifier to a positive quantity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCart {
    pub movie_items: HashMap<String, u32>,
}

impl MovieCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a movie, saturating at `u32::MAX`.
    ///
    /// Adding zero units leaves the cart untouched.
    pub fn add(&mut self, movie_id: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.movie_items.entry(movie_id.into()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Stored quantity for a movie, if any.
    pub fn quantity(&self, movie_id: &str) -> Option<u32> {
        self.movie_items.get(movie_id).copied()
    }

    /// Number of distinct movies in the cart.
    pub fn len(&self) -> usize {
        self.movie_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movie_items.is_empty()
    }
}

impl SessionEntity for MovieCart {
    fn store_prefix() -> &'static str {
        "movie-cart"
    }

    fn validate(&self) -> Result<()> {
        match self.movie_items.iter().find(|(_, qty)| **qty == 0) {
            Some((id, _)) => Err(Error::ValidationError(format!(
                "stored cart holds zero quantity for movie {}",
                id
            ))),
            None => Ok(()),
        }
    }
}

/// One row of the rendered catalog.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub movie: Movie,
    pub quantity: u32,
    /// Always `0.0`; line totals are not computed.
    pub total: f64,
}

impl CartItem {
    pub fn new(movie: Movie, quantity: u32) -> Self {
        CartItem {
            movie,
            quantity,
            total: 0.0,
        }
    }
}

/// Reconciled view: the rows plus the cart badge count.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciled {
    pub items: Vec<CartItem>,
    /// Distinct movie ids in the stored cart, not the sum of quantities.
    pub cart_count: usize,
}

/// Wrap every movie in a row showing `quantity`.
pub fn build_items(movies: Vec<Movie>, quantity: u32) -> Vec<CartItem> {
    movies
        .into_iter()
        .map(|movie| CartItem::new(movie, quantity))
        .collect()
}

/// Overlay stored quantities onto freshly built rows.
///
/// Without a stored cart the rows come back untouched and the count is 0.
/// With one, each row takes its stored quantity or falls back to
/// [`DEFAULT_QUANTITY`]. Stored ids missing from the catalog produce no row
/// but still count toward `cart_count`.
pub fn reconcile(base: Vec<CartItem>, stored: Option<&MovieCart>) -> Reconciled {
    let Some(cart) = stored else {
        return Reconciled {
            items: base,
            cart_count: 0,
        };
    };

    let items = base
        .into_iter()
        .map(|mut item| {
            item.quantity = cart.quantity(&item.movie.id).unwrap_or(DEFAULT_QUANTITY);
            item
        })
        .collect();

    Reconciled {
        items,
        cart_count: cart.len(),
    }
}

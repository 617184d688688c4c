//! Property-based tests for cart reconciliation and catalog ingest.
//!
//! # Properties Tested
//!
//! 1. **Shape Property**: reconciliation never adds, drops or reorders rows
//! 2. **Overlay Property**: each row shows its stored quantity or the default
//! 3. **Count Property**: the badge counts distinct stored ids
//! 4. **Price Property**: ingest prices always fall in the placeholder range
//! 5. **Store Property**: stored carts survive the envelope; foreign bytes never decode

use moviestore::cart::{build_items, DEFAULT_QUANTITY};
use moviestore::catalog::{random_price, ImageBase, ListedMovie, ProviderId, PRICE_RANGE};
use moviestore::serialization::STORE_MAGIC;
use moviestore::{reconcile, Movie, MovieCart, SessionEntity};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Generators
// ============================================================================

fn movie(id: String, popularity: f64) -> Movie {
    Movie {
        title: format!("Movie {}", id),
        id,
        overview: String::new(),
        popularity,
        poster_path: String::new(),
        logo_path: String::new(),
        price: 1.0,
    }
}

/// Catalog with unique ids drawn from a small alphabet so carts overlap it.
fn arb_catalog() -> impl Strategy<Value = Vec<Movie>> {
    prop::collection::btree_set("[a-f]{1,2}", 0..12).prop_map(|ids: BTreeSet<String>| {
        ids.into_iter()
            .enumerate()
            .map(|(rank, id)| movie(id, rank as f64))
            .collect()
    })
}

/// Stored cart with positive quantities.
fn arb_cart() -> impl Strategy<Value = MovieCart> {
    prop::collection::hash_map("[a-h]{1,2}", 1u32..50, 0..10)
        .prop_map(|movie_items: HashMap<String, u32>| MovieCart { movie_items })
}

// ============================================================================
// Reconciliation
// ============================================================================

proptest! {
    /// Property: row ids and order are those of the catalog
    #[test]
    fn prop_reconcile_preserves_rows(catalog in arb_catalog(), cart in proptest::option::of(arb_cart())) {
        let base = build_items(catalog.clone(), DEFAULT_QUANTITY);
        let reconciled = reconcile(base, cart.as_ref());

        let expected: Vec<&str> = catalog.iter().map(|m| m.id.as_str()).collect();
        let actual: Vec<&str> = reconciled.items.iter().map(|i| i.movie.id.as_str()).collect();
        prop_assert_eq!(expected, actual);
    }

    /// Property: quantities are the stored ones, else the default
    #[test]
    fn prop_reconcile_overlays_quantities(catalog in arb_catalog(), cart in arb_cart(), shown in 0u32..3) {
        let base = build_items(catalog, shown);
        let reconciled = reconcile(base, Some(&cart));

        for item in &reconciled.items {
            let expected = cart.movie_items.get(&item.movie.id).copied().unwrap_or(DEFAULT_QUANTITY);
            prop_assert_eq!(item.quantity, expected);
            prop_assert_eq!(item.total, 0.0);
        }
        prop_assert_eq!(reconciled.cart_count, cart.movie_items.len());
    }

    /// Property: without a stored cart nothing changes and the count is zero
    #[test]
    fn prop_reconcile_without_cart_is_identity(catalog in arb_catalog(), shown in 0u32..3) {
        let base = build_items(catalog, shown);
        let reconciled = reconcile(base.clone(), None);

        prop_assert_eq!(reconciled.items, base);
        prop_assert_eq!(reconciled.cart_count, 0);
    }
}

// ============================================================================
// Catalog ingest
// ============================================================================

proptest! {
    /// Property: placeholder prices stay inside [1, 10)
    #[test]
    fn prop_random_price_in_range(_seed in any::<u8>()) {
        let price = random_price();
        prop_assert!(PRICE_RANGE.contains(&price));
    }

    /// Property: image URLs are the configured base followed by the relative path
    #[test]
    fn prop_into_movie_concatenates_image_paths(id in any::<u32>(), path in proptest::option::of("/[a-zA-Z0-9]{4,20}\\.jpg")) {
        let images = ImageBase::default();
        let listed = ListedMovie {
            id: ProviderId::Number(id.into()),
            title: "t".to_string(),
            overview: "o".to_string(),
            popularity: 1.0,
            poster_path: path.clone(),
        };

        let movie = listed.into_movie(&images);
        let rel = path.unwrap_or_default();

        prop_assert_eq!(movie.id, id.to_string());
        prop_assert_eq!(movie.poster_path, format!("{}{}", images.poster, rel));
        prop_assert_eq!(movie.logo_path, format!("{}{}", images.logo, rel));
        prop_assert!(PRICE_RANGE.contains(&movie.price));
    }
}

// ============================================================================
// Session store entries
// ============================================================================

proptest! {
    /// Property: a stored cart reads back equal and valid
    #[test]
    fn prop_cart_store_roundtrip(cart in arb_cart()) {
        let bytes = cart.serialize_for_store().expect("Serialization should succeed");
        prop_assert_eq!(&bytes[0..4], &STORE_MAGIC[..]);

        let decoded = MovieCart::deserialize_from_store(&bytes).expect("Deserialization should succeed");
        prop_assert!(decoded.validate().is_ok());
        prop_assert_eq!(decoded, cart);
    }

    /// Property: bytes without the store magic are always rejected
    #[test]
    fn prop_foreign_bytes_rejected(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(bytes.len() < 4 || bytes[0..4] != STORE_MAGIC[..]);
        prop_assert!(MovieCart::deserialize_from_store(&bytes).is_err());
    }
}

//! Golden blob regression tests.
//!
//! Carts live in a shared session store and outlive any single deploy, so the
//! bytes written for a cart must not drift silently between releases.
//!
//! # When Tests Fail
//!
//! If these tests fail, it means:
//! 1. You accidentally changed the stored format (fix the code), OR
//! 2. You intentionally changed `MovieCart` (bump CURRENT_SCHEMA_VERSION and update the blobs)

use moviestore::backend::{InMemoryBackend, SessionBackend};
use moviestore::serialization::{CURRENT_SCHEMA_VERSION, STORE_MAGIC};
use moviestore::{CartStore, Error, MovieCart, SessionEntity, SessionId};

/// Cart `{"550": 2}` at schema version 1.
const CART_V1: &[u8] = &[
    0x4D, 0x56, 0x53, 0x54, // "MVST"
    0x01, // version
    0x01, // one entry
    0x03, 0x35, 0x35, 0x30, // "550"
    0x02, // quantity
];

/// Empty cart at schema version 1.
const EMPTY_CART_V1: &[u8] = &[0x4D, 0x56, 0x53, 0x54, 0x01, 0x00];

/// Empty cart claiming a future schema version.
const EMPTY_CART_V2: &[u8] = &[0x4D, 0x56, 0x53, 0x54, 0x02, 0x00];

/// Right layout, foreign magic.
const FOREIGN_MAGIC: &[u8] = &[0x43, 0x4B, 0x49, 0x54, 0x01, 0x00];

#[test]
fn test_schema_version_is_pinned() {
    assert_eq!(CURRENT_SCHEMA_VERSION, 1);
    assert_eq!(&STORE_MAGIC, b"MVST");
}

#[test]
fn test_cart_serializes_to_golden_bytes() {
    let mut cart = MovieCart::new();
    cart.add("550", 2);

    assert_eq!(cart.serialize_for_store().expect("Failed to serialize"), CART_V1);
    assert_eq!(
        MovieCart::new()
            .serialize_for_store()
            .expect("Failed to serialize"),
        EMPTY_CART_V1
    );
}

#[test]
fn test_golden_bytes_decode() {
    let cart = MovieCart::deserialize_from_store(CART_V1).expect("Failed to decode");
    assert_eq!(cart.quantity("550"), Some(2));
    assert_eq!(cart.len(), 1);

    let empty = MovieCart::deserialize_from_store(EMPTY_CART_V1).expect("Failed to decode");
    assert!(empty.is_empty());
}

#[test]
fn test_future_version_is_rejected() {
    match MovieCart::deserialize_from_store(EMPTY_CART_V2) {
        Err(Error::VersionMismatch { expected, found }) => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("Expected VersionMismatch, got {:?}", other),
    }
}

#[test]
fn test_foreign_magic_is_rejected() {
    assert!(matches!(
        MovieCart::deserialize_from_store(FOREIGN_MAGIC),
        Err(Error::InvalidStoreEntry(_))
    ));
}

#[test]
fn test_truncated_blob_is_rejected() {
    for len in 0..CART_V1.len() {
        assert!(
            MovieCart::deserialize_from_store(&CART_V1[..len]).is_err(),
            "prefix of {} bytes should not decode",
            len
        );
    }
}

#[tokio::test]
async fn test_store_serves_golden_cart_and_evicts_stale_one() {
    let backend = InMemoryBackend::new();
    let store = CartStore::new(backend.clone());

    backend
        .set("movie-cart:current", CART_V1.to_vec(), None)
        .await
        .expect("Failed to set");
    backend
        .set("movie-cart:stale", EMPTY_CART_V2.to_vec(), None)
        .await
        .expect("Failed to set");

    let current = store
        .load(&SessionId::new("current"))
        .await
        .expect("Failed to load");
    assert_eq!(current.and_then(|c| c.quantity("550")), Some(2));

    let stale = store
        .load(&SessionId::new("stale"))
        .await
        .expect("Failed to load");
    assert!(stale.is_none());
    assert!(!backend
        .exists("movie-cart:stale")
        .await
        .expect("Failed to check exists"));
}

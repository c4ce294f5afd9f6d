//! Backend-agnostic behavioral contract for providers.
//!
//! Every provider implementation, wrapped in [`Kv`], must pass this suite.
//! Enable the `test-utils` feature to run it from another crate's tests:
//!
//! ```toml
//! [dev-dependencies]
//! treekv-core = { version = "0.1", features = ["test-utils"] }
//! ```
//!
//! The suite leaves the store as it found it (every key it creates is
//! deleted again), so it can run against shared fixtures.

use crate::{key, Error, Kv};

/// Run the full behavioral contract against a store.
pub async fn kv_contract(kv: &Kv) {
    flat_tests(kv).await;
    dir_tests(kv).await;
    cas_tests(kv).await;
}

/// Flat-namespace behavior: single-component keys, leading-`/` equivalence,
/// lifecycle of set / get / delete.
pub async fn flat_tests(kv: &Kv) {
    let missing = kv.get(&key!("foobar")).await;
    assert!(
        matches!(missing, Err(Error::NotFound { .. })),
        "get of a non-existent key must fail with NotFound, got {missing:?}"
    );

    kv.set(&key!("foobar"), "foobar")
        .await
        .expect("set of a fresh key must succeed");

    for form in ["foobar", "/foobar"] {
        let node = kv
            .get(&key!(form))
            .await
            .unwrap_or_else(|e| panic!("get of existing key {form:?} failed: {e}"));
        assert!(!node.is_dir, "get {form:?} returned a directory, value expected");
        assert_eq!(node.value.as_deref(), Some(b"foobar".as_ref()));
    }

    // Update through the leading-slash form, observe through the bare form.
    kv.set(&key!("/foobar"), "barfoo")
        .await
        .expect("set through the leading-slash form must succeed");
    let node = kv.get(&key!("foobar")).await.unwrap();
    assert_eq!(node.value.as_deref(), Some(b"barfoo".as_ref()));

    kv.delete(&key!("foobar"))
        .await
        .expect("delete of an existing key must succeed");
    assert!(matches!(
        kv.get(&key!("foobar")).await,
        Err(Error::NotFound { .. })
    ));

    kv.set(&key!("barfoo"), "barfoo").await.unwrap();
    kv.delete(&key!("/barfoo"))
        .await
        .expect("delete through the leading-slash form must succeed");

    let gone = kv.delete(&key!("does-not-exist")).await;
    assert!(
        matches!(gone, Err(Error::NotFound { .. })),
        "delete of a non-existent key must fail with NotFound, got {gone:?}"
    );
}

/// Directory-namespace behavior: intermediate directory creation, the
/// value-in-the-way conflict, child listing.
pub async fn dir_tests(kv: &Kv) {
    assert!(matches!(
        kv.get(&key!("/x/b/c")).await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        kv.delete(&key!("/x/b/c")).await,
        Err(Error::NotFound { .. })
    ));

    // A value node blocks the paths below it.
    kv.set(&key!("/a"), "test").await.unwrap();
    let blocked = kv.set(&key!("/a/b"), "test").await;
    assert!(
        matches!(blocked, Err(Error::Conflict { .. })),
        "set below a value node must fail with Conflict, got {blocked:?}"
    );
    kv.delete(&key!("/a")).await.unwrap();

    kv.set(&key!("/a/a"), "1").await.unwrap();
    kv.set(&key!("/a/b"), "2").await.unwrap();
    kv.set(&key!("/a/c/c/b"), "3").await.unwrap();

    for (path, want) in [("/a/a", "1"), ("/a/b", "2"), ("/a/c/c/b", "3")] {
        let node = kv
            .get(&key!(path))
            .await
            .unwrap_or_else(|e| panic!("get of existing key {path:?} failed: {e}"));
        assert!(!node.is_dir, "{path:?} must be a value, not a directory");
        assert_eq!(node.value.as_deref(), Some(want.as_bytes()));
    }

    let dir = kv.get(&key!("/a")).await.unwrap();
    assert!(dir.is_dir, "/a must be a directory after nested sets");
    assert_eq!(dir.value, None, "a directory node never carries a value");
    assert_eq!(
        dir.children.len(),
        3,
        "/a must list exactly its immediate children: {:?}",
        dir.child_keys()
    );

    let a = dir.child("a").expect("/a/a missing from listing");
    assert!(!a.is_dir, "child a/a should be a value, not a directory");
    let b = dir.child("b").expect("/a/b missing from listing");
    assert!(!b.is_dir, "child a/b should be a value, not a directory");
    let c = dir.child("c").expect("/a/c missing from listing");
    assert!(c.is_dir, "child a/c should be a directory, not a value");
    assert!(
        c.children.is_empty(),
        "a non-recursive get must not populate grandchildren"
    );

    let distinct: std::collections::BTreeSet<_> = dir.child_keys().into_iter().collect();
    assert_eq!(distinct.len(), 3, "listing must not contain duplicates");

    // The root is addressable under both spellings.
    for root in ["", "/"] {
        let node = kv.get(&key!(root)).await.unwrap();
        assert!(node.is_dir, "the root is a directory");
        assert!(node.child("a").is_some());
    }

    // Deleting the directory removes every descendant.
    kv.delete(&key!("/a")).await.unwrap();
    for gone in ["/a", "/a/a", "/a/c/c/b"] {
        assert!(
            matches!(kv.get(&key!(gone)).await, Err(Error::NotFound { .. })),
            "{gone:?} must be gone after its directory was deleted"
        );
    }
}

/// Compare-and-swap behavior.
pub async fn cas_tests(kv: &Kv) {
    let missing = kv.cas(&key!("cas-missing"), b"x", "y").await;
    assert!(
        matches!(missing, Err(Error::NotFound { .. })),
        "cas on a non-existent key must fail with NotFound, got {missing:?}"
    );

    kv.set(&key!("cas"), "one").await.unwrap();

    kv.cas(&key!("cas"), b"one", "two")
        .await
        .expect("cas with the matching expected value must succeed");
    let node = kv.get(&key!("cas")).await.unwrap();
    assert_eq!(node.value.as_deref(), Some(b"two".as_ref()));

    let stale = kv.cas(&key!("cas"), b"one", "three").await;
    assert!(
        matches!(stale, Err(Error::Conflict { .. })),
        "cas with a stale expected value must fail with Conflict, got {stale:?}"
    );
    let node = kv.get(&key!("cas")).await.unwrap();
    assert_eq!(
        node.value.as_deref(),
        Some(b"two".as_ref()),
        "a failed cas must leave the value unchanged"
    );

    kv.set(&key!("cas-dir/leaf"), "v").await.unwrap();
    let on_dir = kv.cas(&key!("cas-dir"), b"", "x").await;
    assert!(
        matches!(on_dir, Err(Error::Conflict { .. })),
        "cas on a directory must fail with Conflict, got {on_dir:?}"
    );

    kv.delete(&key!("cas")).await.unwrap();
    kv.delete(&key!("cas-dir")).await.unwrap();
}

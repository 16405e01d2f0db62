//! Browser-run integration tests for the store handle.
//!
//! Run with `wasm-pack test --headless --chrome` (or `--firefox`).

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use idb_store::{IdbStore, StoreError};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    id: String,
    val: i32,
}

fn item(id: &str, val: i32) -> Item {
    Item {
        id: id.to_string(),
        val,
    }
}

/// Resolve once the handle reports open.
async fn wait_open(store: &IdbStore<Item>) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        store.is_open(move |open| {
            if open {
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
    });
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .expect("open signal");
}

/// Delete any leftover database from a previous run, then open a fresh one.
async fn fresh_store(db_name: &str) -> IdbStore<Item> {
    IdbStore::<Item>::delete_database(db_name)
        .await
        .expect("delete database");
    let store = IdbStore::new(db_name, "items");
    wait_open(&store).await;
    store
}

#[wasm_bindgen_test]
async fn data_ops_fail_fast_before_open() {
    // No awaits between construction and the calls, so the open request
    // cannot have resolved yet: every operation must reject synchronously.
    let store: IdbStore<Item> = IdbStore::new("idb-store-test-notopen", "items");

    assert!(matches!(store.get("a").await, Err(StoreError::NotOpen)));
    assert!(matches!(
        store.set(&item("a", 1)).await,
        Err(StoreError::NotOpen)
    ));
    assert!(matches!(store.get_all().await, Err(StoreError::NotOpen)));
    assert!(matches!(store.remove("a").await, Err(StoreError::NotOpen)));
}

#[wasm_bindgen_test]
async fn subscriber_fires_at_registration_and_on_open() {
    let db = "idb-store-test-subs";
    IdbStore::<Item>::delete_database(db).await.unwrap();
    let store: IdbStore<Item> = IdbStore::new(db, "items");

    let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let _sub = store.is_open(move |open| seen_cb.borrow_mut().push(open));

    assert_eq!(*seen.borrow(), vec![false]);

    wait_open(&store).await;
    assert_eq!(*seen.borrow(), vec![false, true]);
}

#[wasm_bindgen_test]
async fn subscriber_registered_after_open_sees_true_immediately() {
    let store = fresh_store("idb-store-test-subs-late").await;

    let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let _sub = store.is_open(move |open| seen_cb.borrow_mut().push(open));

    assert_eq!(*seen.borrow(), vec![true]);
}

#[wasm_bindgen_test]
async fn unsubscribe_before_open_suppresses_notification() {
    let db = "idb-store-test-unsub";
    IdbStore::<Item>::delete_database(db).await.unwrap();
    let store: IdbStore<Item> = IdbStore::new(db, "items");

    let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let sub = store.is_open(move |open| seen_cb.borrow_mut().push(open));

    sub.unsubscribe();
    sub.unsubscribe(); // second call is a no-op

    wait_open(&store).await;
    assert_eq!(*seen.borrow(), vec![false]);
}

#[wasm_bindgen_test]
async fn set_then_get_round_trips() {
    let store = fresh_store("idb-store-test-roundtrip").await;

    let key = store.set(&item("a", 1)).await.unwrap();
    assert_eq!(key.as_string().as_deref(), Some("a"));

    let got = store.get("a").await.unwrap();
    assert_eq!(got, Some(item("a", 1)));
}

#[wasm_bindgen_test]
async fn set_is_an_upsert() {
    let store = fresh_store("idb-store-test-upsert").await;

    store.set(&item("a", 1)).await.unwrap();
    store.set(&item("a", 2)).await.unwrap();

    assert_eq!(store.get("a").await.unwrap(), Some(item("a", 2)));
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}

#[wasm_bindgen_test]
async fn get_missing_key_is_none() {
    let store = fresh_store("idb-store-test-miss").await;
    assert_eq!(store.get("nope").await.unwrap(), None);
}

#[wasm_bindgen_test]
async fn remove_deletes_and_missing_key_is_ok() {
    let store = fresh_store("idb-store-test-remove").await;

    store.set(&item("a", 1)).await.unwrap();
    store.remove("a").await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), None);

    // delete-by-missing-key is not an error
    store.remove("a").await.unwrap();
}

#[wasm_bindgen_test]
async fn get_all_reflects_contents() {
    let store = fresh_store("idb-store-test-getall").await;

    assert!(store.get_all().await.unwrap().is_empty());

    store.set(&item("a", 1)).await.unwrap();
    store.set(&item("b", 2)).await.unwrap();
    store.set(&item("c", 3)).await.unwrap();

    let mut all = store.get_all().await.unwrap();
    all.sort_by(|x, y| x.id.cmp(&y.id));
    assert_eq!(all, vec![item("a", 1), item("b", 2), item("c", 3)]);
}

#[wasm_bindgen_test]
async fn full_lifecycle_scenario() {
    let store = fresh_store("idb-store-test-app").await;

    store.set(&item("a", 1)).await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), Some(item("a", 1)));

    store.remove("a").await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), None);
}

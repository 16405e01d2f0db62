//! Typed IndexedDB store handle for browser WASM
//!
//! This crate wraps one IndexedDB database with one object store behind a
//! small async CRUD surface. The handle is created synchronously while the
//! database opens in the background; an open-state subscription lets callers
//! sequence reads and writes behind the open.
//!
//! Records are serde types whose serialized form carries an `id` field, the
//! object store's keyPath. The wrapper adds no locking, batching, or retry
//! logic: concurrent operations are serialized by IndexedDB's own transaction
//! scheduling, and engine errors surface verbatim on the calling future.
//!
//! # Example
//!
//! ```rust,ignore
//! use idb_store::IdbStore;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Item {
//!     id: String,
//!     val: i32,
//! }
//!
//! let store: IdbStore<Item> = IdbStore::new("app", "items");
//!
//! let sub = store.is_open(|open| {
//!     // fires immediately with the current flag, then with `true`
//!     // once the database finishes opening
//! });
//!
//! store.set(&Item { id: "a".into(), val: 1 }).await?;
//! let item = store.get("a").await?;
//! store.remove("a").await?;
//! sub.unsubscribe();
//! ```

pub mod error;
pub mod idb;
pub mod store;
pub mod subs;

pub use error::{Result, StoreError};
pub use store::{IdbStore, Subscription};

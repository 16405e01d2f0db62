//! Typed store handle over one IndexedDB database and object store.
//!
//! `IdbStore::new` returns immediately while the open request runs on the
//! current-thread executor, so callers sequence reads/writes via `is_open`.
//! All data operations check the connection first and fail fast with
//! `StoreError::NotOpen` before touching the engine.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{IdbDatabase, IdbTransactionMode};

use crate::error::{Result, StoreError};
use crate::idb;
use crate::subs::Subscribers;

/// Shared handle state. Owned by the handle and its subscriptions, never
/// module-level: two handles to different databases do not interact.
#[derive(Default)]
struct Inner {
    db: Option<IdbDatabase>,
    open: bool,
    subs: Subscribers,
}

/// Handle to one (database, object store) pair, generic over the record type.
///
/// Records are any `Serialize + DeserializeOwned` value whose serialized form
/// carries an `id` field; that field is the object store's keyPath, so `set`
/// is an upsert keyed by it. Uniqueness of `id` is the engine's concern.
///
/// All methods are async because IndexedDB is callback-based. The handle is
/// `Rc`-backed and single-threaded, matching the browser event loop.
pub struct IdbStore<T> {
    inner: Rc<RefCell<Inner>>,
    store_name: String,
    _record: PhantomData<T>,
}

/// Registration returned by [`IdbStore::is_open`].
///
/// Call [`unsubscribe`](Subscription::unsubscribe) to remove the callback;
/// repeated calls are no-ops. Dropping the subscription without unsubscribing
/// leaves the callback registered.
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<Inner>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().subs.remove(self.id);
        }
    }
}

impl<T> IdbStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a handle and schedule the open request for the named database.
    ///
    /// Returns before the open resolves. On first open the object store is
    /// created with `"id"` as keyPath. On open success every subscriber
    /// registered at that moment is notified with `true`; on open failure the
    /// error is logged to the console and the handle stays closed, so every
    /// data operation keeps failing with [`StoreError::NotOpen`].
    pub fn new(db_name: &str, store_name: &str) -> Self {
        let inner = Rc::new(RefCell::new(Inner::default()));

        let state = inner.clone();
        let db_name = db_name.to_string();
        let name = store_name.to_string();
        spawn_local(async move {
            match idb::open_database(&db_name, &name).await {
                Ok(db) => {
                    let snapshot = {
                        let mut state = state.borrow_mut();
                        state.db = Some(db);
                        state.open = true;
                        state.subs.snapshot()
                    };
                    for cb in snapshot {
                        cb(true);
                    }
                }
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("unable to open IndexedDB database {}: {}", db_name, e).into(),
                    );
                }
            }
        });

        Self {
            inner,
            store_name: store_name.to_string(),
            _record: PhantomData,
        }
    }

    /// Subscribe to the open-state flag.
    ///
    /// The callback fires immediately with the current value, then once more
    /// with `true` when the open request succeeds (unless unsubscribed
    /// first). The flag only ever transitions false to true, once.
    pub fn is_open(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        let callback: Rc<dyn Fn(bool)> = Rc::new(callback);

        let open = self.inner.borrow().open;
        callback(open);

        let id = self.inner.borrow_mut().subs.insert(callback);
        Subscription {
            id,
            state: Rc::downgrade(&self.inner),
        }
    }

    /// Insert or replace a record, keyed by its `id` field.
    ///
    /// Resolves with the key the engine reports for the stored record.
    pub async fn set(&self, record: &T) -> Result<JsValue> {
        let db = self.connection()?;
        let value = to_js(record)?;

        let (tx, store) =
            idb::begin_transaction(&db, &self.store_name, IdbTransactionMode::Readwrite)?;

        let req = store.put(&value)?;
        let key = idb::await_request(&req).await?;
        idb::await_transaction(&tx).await?;

        Ok(key)
    }

    /// Point lookup by primary key. Resolves to `None` if no record has it.
    pub async fn get<K>(&self, id: &K) -> Result<Option<T>>
    where
        K: Serialize + ?Sized,
    {
        let db = self.connection()?;
        let key = to_js(id)?;

        let (tx, store) =
            idb::begin_transaction(&db, &self.store_name, IdbTransactionMode::Readonly)?;

        let req = store.get(&key)?;
        let result = idb::await_request(&req).await?;
        idb::await_transaction(&tx).await?;

        if result.is_undefined() || result.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_wasm_bindgen::from_value(result)?))
    }

    /// Retrieve every record in the store, in engine order.
    pub async fn get_all(&self) -> Result<Vec<T>> {
        let db = self.connection()?;

        let (tx, store) =
            idb::begin_transaction(&db, &self.store_name, IdbTransactionMode::Readonly)?;

        let req = store.get_all()?;
        let result = idb::await_request(&req).await?;
        idb::await_transaction(&tx).await?;

        let array = js_sys::Array::from(&result);
        let mut records = Vec::with_capacity(array.length() as usize);
        for i in 0..array.length() {
            records.push(serde_wasm_bindgen::from_value(array.get(i))?);
        }
        Ok(records)
    }

    /// Delete a record by primary key. Deleting a missing key is not an error.
    pub async fn remove<K>(&self, id: &K) -> Result<()>
    where
        K: Serialize + ?Sized,
    {
        let db = self.connection()?;
        let key = to_js(id)?;

        let (tx, store) =
            idb::begin_transaction(&db, &self.store_name, IdbTransactionMode::Readwrite)?;

        let req = store.delete(&key)?;
        idb::await_request(&req).await?;
        idb::await_transaction(&tx).await?;

        Ok(())
    }

    /// Delete a database by name (for testing/cleanup).
    pub async fn delete_database(db_name: &str) -> Result<()> {
        idb::delete_database(db_name).await
    }

    fn connection(&self) -> Result<IdbDatabase> {
        self.inner.borrow().db.clone().ok_or(StoreError::NotOpen)
    }
}

/// Serialize a record or key to a plain JS value.
///
/// Uses the JSON-compatible serializer so maps land as plain objects rather
/// than JS `Map`s, which keyPath extraction cannot see into.
fn to_js<V>(value: &V) -> Result<JsValue>
where
    V: Serialize + ?Sized,
{
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

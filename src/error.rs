//! Error types for the IndexedDB store handle

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// IndexedDB is not available in this environment
    #[error("IndexedDB not available: {0}")]
    NotAvailable(String),

    /// The database connection is not open yet (or the open failed)
    #[error("IndexedDB store is not open")]
    NotOpen,

    /// Database open/upgrade error
    #[error("IndexedDB open error: {0}")]
    Open(String),

    /// Transaction error
    #[error("IndexedDB transaction error: {0}")]
    Transaction(String),

    /// Request error from an IDB operation
    #[error("IndexedDB request error: {0}")]
    Request(String),

    /// Record/key serialization or deserialization error
    #[error("serde error: {0}")]
    Serde(#[from] serde_wasm_bindgen::Error),
}

impl From<wasm_bindgen::JsValue> for StoreError {
    fn from(val: wasm_bindgen::JsValue) -> Self {
        let msg = js_sys::JSON::stringify(&val)
            .map(String::from)
            .unwrap_or_else(|_| format!("{:?}", val));
        StoreError::Request(msg)
    }
}

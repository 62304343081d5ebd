//! Session-scoped draft storage.
//!
//! The ephemeral counterpart to the durable history store: one booking
//! draft and one repeat-request draft per session, kept as JSON strings
//! under fixed keys. The store lives and dies with the session; nothing
//! here survives a restart.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key for the in-progress booking draft.
pub const BOOKING_DRAFT_KEY: &str = "yourgp_booking_state";

/// Storage key for the in-progress repeat-request draft.
pub const REQUEST_DRAFT_KEY: &str = "yourgp_prescription_request_state";

/// Session-scoped key/value storage.
///
/// Implementations hold opaque JSON strings; draft typing happens at the
/// load/save boundary. Concurrent views of the same session share one
/// store, last write wins.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Load a draft from the store. An absent key or malformed JSON yields the
/// empty draft; corruption is logged, never surfaced.
pub fn load_draft<T>(store: &dyn SessionStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        None => T::default(),
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "discarding malformed draft state");
            T::default()
        }),
    }
}

/// Persist a draft to the store as JSON.
pub fn save_draft<T: Serialize>(store: &mut dyn SessionStore, key: &str, draft: &T) {
    match serde_json::to_string(draft) {
        Ok(json) => store.set(key, json),
        Err(e) => tracing::error!(key, error = %e, "failed to serialize draft state"),
    }
}

//! Bounded quote history over a key-value store.
//!
//! The store is the external persistence collaborator (localStorage in the
//! browser). Every storage failure is swallowed and logged: saving silently
//! fails, loading silently returns an empty history. Persistence must never
//! break quoting.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::console;
use crate::quote::{Quote, QuoteRequest};

/// Storage key holding the JSON-encoded history list.
pub const HISTORY_KEY: &str = "quoteHistory";

/// Most-recent entries kept; older ones are evicted on save.
pub const HISTORY_LIMIT: usize = 10;

/// Minimal key-value persistence seam.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value; `false` means the store rejected it (full, denied).
    fn set(&mut self, key: &str, value: &str) -> bool;

    fn remove(&mut self, key: &str);
}

/// In-process store used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.entries.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// `localStorage` of the current window.
///
/// Absent storage (sandboxed frame, disabled cookies) degrades every
/// operation to a no-op, per the persistence error policy.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        local_storage().is_some_and(|s| s.set_item(key, value).is_ok())
    }

    fn remove(&mut self, key: &str) {
        if let Some(s) = local_storage() {
            let _ = s.remove_item(key);
        }
    }
}

/// One saved quote with its inputs, identity and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Generated v4 UUID.
    pub id: String,
    /// Creation time, Unix milliseconds. Entries persisted without one are
    /// backfilled with the current time on load.
    #[serde(default)]
    pub timestamp: i64,
    pub variant: String,
    pub width: u32,
    pub height: u32,
    pub margin_percent: f64,
    #[serde(flatten)]
    pub quote: Quote,
    /// Optional user-supplied label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The bounded history itself, generic over its store.
#[derive(Debug, Default)]
pub struct QuoteHistory<S> {
    store: S,
}

impl<S: KeyValueStore> QuoteHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the history, newest first.
    ///
    /// A missing key is an empty history. Content that does not decode as an
    /// entry list is corrupt: logged and treated as empty rather than
    /// surfaced.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.store.get(HISTORY_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                for entry in &mut entries {
                    if entry.timestamp <= 0 {
                        entry.timestamp = now_ms();
                    }
                }
                entries
            }
            Err(e) => {
                console::warn(&format!("stored quote history is corrupt, ignoring it: {e}"));
                Vec::new()
            }
        }
    }

    /// Save one accepted quote; returns the entry as persisted.
    ///
    /// The new entry is prepended and anything beyond [`HISTORY_LIMIT`] is
    /// dropped. A store that rejects the write loses the entry silently
    /// (logged), matching the persistence error policy.
    pub fn save(&mut self, request: &QuoteRequest, quote: Quote, label: Option<String>) -> HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: now_ms(),
            variant: request.variant.clone(),
            width: request.width,
            height: request.height,
            margin_percent: request.margin_percent,
            quote,
            label,
        };

        let mut entries = self.load();
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_LIMIT);

        match serde_json::to_string(&entries) {
            Ok(encoded) => {
                if !self.store.set(HISTORY_KEY, &encoded) {
                    console::warn("quote history store rejected the write");
                }
            }
            Err(e) => console::warn(&format!("failed to encode quote history: {e}")),
        }

        entry
    }

    /// Drop the whole history.
    pub fn clear(&mut self) {
        self.store.remove(HISTORY_KEY);
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

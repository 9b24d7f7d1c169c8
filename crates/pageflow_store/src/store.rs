//! Session-scoped, page-partitioned state.
//!
//! Each session is an ordered list of [`PageEntry`] values (first-write
//! order) serialized as one JSON blob under `prefix + session_id`.
//!
//! The store keeps an in-memory copy of every session it touched. A medium
//! that answers is authoritative (an absent blob means the session expired)
//! unless the session's last write never reached it. A medium that fails is
//! logged and the in-memory copy is used instead, so the store keeps working
//! without persistence.

use std::sync::Arc;

use hashbrown::HashMap;
use pageflow_graph::graph::Graph;
use pageflow_graph::node::NodeId;
use pageflow_graph::state::{AccumulatedState, PageEntry, PageState};
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::PersistenceError;
use crate::storage::Storage;

/// Key prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "pageflow:";

type Sessions = HashMap<String, Cached>;

#[derive(Debug, Clone)]
struct Cached {
    entries: Vec<PageEntry>,
    // False while the medium holds an older copy (or none) of this session.
    persisted: bool,
}

/// Page-partitioned key-value state for flow sessions.
///
/// # Example
///
/// ```
/// use pageflow_store::{MemoryStorage, StateStore};
///
/// let store = StateStore::with_storage(MemoryStorage::new());
/// store.set_key("s1", "details", "email", "ada@example.com");
///
/// assert!(store.has_session("s1"));
/// assert_eq!(
///     store.get_page_state("s1", "details").get("email").and_then(|v| v.as_str()),
///     Some("ada@example.com"),
/// );
/// ```
pub struct StateStore {
    storage: Option<Arc<dyn Storage>>,
    prefix: String,
    sessions: Mutex<Sessions>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateStore")
            .field("persistent", &self.storage.is_some())
            .field("prefix", &self.prefix)
            .field("cached_sessions", &self.sessions.lock().len())
            .finish()
    }
}

impl StateStore {
    /// Creates an in-memory store with no persistence medium.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: None,
            prefix: DEFAULT_PREFIX.to_owned(),
            sessions: Mutex::default(),
        }
    }

    /// Creates a store persisting to `storage`.
    #[must_use]
    pub fn with_storage(storage: impl Storage + 'static) -> Self {
        Self::with_shared_storage(Arc::new(storage))
    }

    /// Creates a store persisting to a medium shared with other owners.
    #[must_use]
    pub fn with_shared_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
            ..Self::new()
        }
    }

    /// Sets the key prefix for persisted blobs.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Returns the key prefix for persisted blobs.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the storage key for a session.
    #[must_use]
    pub fn storage_key(&self, session_id: &str) -> String {
        format!("{}{session_id}", self.prefix)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns true if any state exists for the session.
    #[must_use]
    pub fn has_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock();
        self.load(&mut sessions, session_id).is_some()
    }

    /// Returns one page's state, or an empty map if the page has none.
    #[must_use]
    pub fn get_page_state(&self, session_id: &str, page_id: &str) -> PageState {
        let mut sessions = self.sessions.lock();
        self.load(&mut sessions, session_id)
            .and_then(|entries| entries.into_iter().find(|entry| entry.page_id == page_id))
            .map(|entry| entry.state)
            .unwrap_or_default()
    }

    /// Returns one value from one page's state.
    #[must_use]
    pub fn read(&self, session_id: &str, page_id: &str, key: &str) -> Option<Value> {
        self.get_page_state(session_id, page_id).remove(key)
    }

    /// Returns every page's state for the session, in first-write order.
    #[must_use]
    pub fn get_all_state(&self, session_id: &str) -> AccumulatedState {
        let mut sessions = self.sessions.lock();
        AccumulatedState::from_entries(self.load(&mut sessions, session_id).unwrap_or_default())
    }

    /// Returns the state of pages up to and including `page_id` in the
    /// graph's traversal order.
    ///
    /// Pages keep their first-write order in the result. A page unknown to
    /// the graph yields empty state.
    #[must_use]
    pub fn get_state_up_to(
        &self,
        graph: &Graph,
        session_id: &str,
        page_id: &str,
    ) -> AccumulatedState {
        let order = graph.traversal_order();
        let Some(position) = order.iter().position(|id| id == page_id) else {
            tracing::warn!(page = %page_id, "partial state requested for a page outside the graph");
            return AccumulatedState::new();
        };
        let included = &order[..=position];

        let entries = self
            .get_all_state(session_id)
            .into_entries()
            .into_iter()
            .filter(|entry| included.contains(&entry.page_id))
            .collect();
        AccumulatedState::from_entries(entries)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ensures every page of the graph has an entry, creating the session if
    /// needed.
    ///
    /// Pages are added in [`Graph::traversal_order`]; pages that already have
    /// state are left untouched, so calling this again is a no-op.
    pub fn pre_register(&self, graph: &Graph, session_id: &str) {
        let added = self.update(session_id, |entries| {
            let mut added = 0;
            for page_id in graph.traversal_order() {
                if !entries.iter().any(|entry| entry.page_id == page_id) {
                    entries.push(PageEntry::empty(page_id));
                    added += 1;
                }
            }
            added
        });
        tracing::debug!(session = %session_id, added, "pre-registered page state");
    }

    /// Upserts one key of one page's state.
    pub fn set_key(
        &self,
        session_id: &str,
        page_id: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let (key, value) = (key.into(), value.into());
        self.update(session_id, |entries| {
            page_entry(entries, page_id).state.insert(key, value);
        });
    }

    /// Merges several keys into one page's state in a single write.
    pub fn set_batch<I, K, V>(&self, session_id: &str, page_id: &str, updates: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let updates: Vec<(String, Value)> = updates
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.update(session_id, |entries| {
            page_entry(entries, page_id).state.extend(updates);
        });
    }

    /// Removes all state of the session, in memory and in the medium.
    pub fn clear_session(&self, session_id: &str) {
        self.sessions.lock().remove(session_id);
        if let Some(storage) = &self.storage
            && let Err(err) = storage.remove(&self.storage_key(session_id))
        {
            tracing::warn!(
                session = %session_id,
                error = %err,
                "failed to remove persisted flow state"
            );
        }
    }

    /// Removes one page's entry. Does nothing if the session does not exist.
    pub fn clear_page(&self, session_id: &str, page_id: &str) {
        let mut sessions = self.sessions.lock();
        let Some(mut entries) = self.load(&mut sessions, session_id) else {
            return;
        };
        entries.retain(|entry| entry.page_id != page_id);
        self.commit(&mut sessions, session_id, entries);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence plumbing
    // ─────────────────────────────────────────────────────────────────────────

    fn update<R>(&self, session_id: &str, f: impl FnOnce(&mut Vec<PageEntry>) -> R) -> R {
        let mut sessions = self.sessions.lock();
        let mut entries = self.load(&mut sessions, session_id).unwrap_or_default();
        let result = f(&mut entries);
        self.commit(&mut sessions, session_id, entries);
        result
    }

    fn load(&self, sessions: &mut Sessions, session_id: &str) -> Option<Vec<PageEntry>> {
        let cached = sessions.get(session_id).map(|cached| cached.entries.clone());
        let Some(storage) = &self.storage else {
            return cached;
        };
        if sessions.get(session_id).is_some_and(|cached| !cached.persisted) {
            return cached;
        }

        match self.read_persisted(storage.as_ref(), session_id) {
            Ok(Some(entries)) => {
                let cached = Cached {
                    entries: entries.clone(),
                    persisted: true,
                };
                sessions.insert(session_id.to_owned(), cached);
                Some(entries)
            }
            Ok(None) => {
                sessions.remove(session_id);
                None
            }
            Err(err) => {
                tracing::warn!(
                    session = %session_id,
                    error = %err,
                    "failed to read persisted flow state, using in-memory state"
                );
                cached
            }
        }
    }

    fn read_persisted(
        &self,
        storage: &dyn Storage,
        session_id: &str,
    ) -> Result<Option<Vec<PageEntry>>, PersistenceError> {
        let Some(blob) = storage.get(&self.storage_key(session_id))? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&blob)?))
    }

    fn commit(&self, sessions: &mut Sessions, session_id: &str, entries: Vec<PageEntry>) {
        let persisted = match &self.storage {
            Some(storage) => match self.write_persisted(storage.as_ref(), session_id, &entries) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(
                        session = %session_id,
                        error = %err,
                        "failed to persist flow state, keeping it in memory only"
                    );
                    false
                }
            },
            None => true,
        };
        sessions.insert(session_id.to_owned(), Cached { entries, persisted });
    }

    fn write_persisted(
        &self,
        storage: &dyn Storage,
        session_id: &str,
        entries: &[PageEntry],
    ) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(entries)?;
        storage.set(&self.storage_key(session_id), &blob)?;
        Ok(())
    }
}

fn page_entry<'a>(entries: &'a mut Vec<PageEntry>, page_id: &str) -> &'a mut PageEntry {
    match entries.iter().position(|entry| entry.page_id == page_id) {
        Some(index) => &mut entries[index],
        None => {
            entries.push(PageEntry::empty(NodeId::from(page_id)));
            let last = entries.len() - 1;
            &mut entries[last]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[test]
    fn set_then_get_round_trip() {
        let store = StateStore::new();
        store.set_key("s", "p", "k", "v");

        assert_eq!(store.get_page_state("s", "p").get("k"), Some(&json!("v")));
        assert_eq!(store.read("s", "p", "k"), Some(json!("v")));
    }

    #[test]
    fn missing_page_yields_empty_state() {
        let store = StateStore::new();
        assert!(store.get_page_state("s", "p").is_empty());
        assert!(!store.has_session("s"));
    }

    #[test]
    fn clear_session_removes_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let store = StateStore::with_shared_storage(storage.clone());
        store.set_key("s", "p", "k", 1);
        assert!(storage.get("pageflow:s").unwrap().is_some());

        store.clear_session("s");
        assert!(!store.has_session("s"));
        assert!(storage.is_empty());
    }

    #[test]
    fn clear_page_keeps_other_pages() {
        let store = StateStore::new();
        store.set_key("s", "a", "k", 1);
        store.set_key("s", "b", "k", 2);

        store.clear_page("s", "a");
        let all = store.get_all_state("s");
        assert_eq!(all.pages().map(NodeId::as_str).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn clear_page_on_missing_session_does_not_create_it() {
        let store = StateStore::new();
        store.clear_page("s", "a");
        assert!(!store.has_session("s"));
    }

    #[test]
    fn custom_prefix_is_used_for_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = StateStore::with_shared_storage(storage.clone()).with_prefix("checkout/");
        store.set_key("abc", "p", "k", true);

        assert_eq!(store.storage_key("abc"), "checkout/abc");
        assert_eq!(storage.keys(), vec!["checkout/abc".to_string()]);
    }

    #[test]
    fn blob_is_an_ordered_entry_list() {
        let storage = Arc::new(MemoryStorage::new());
        let store = StateStore::with_shared_storage(storage.clone());
        store.set_key("s", "b", "x", 1);
        store.set_key("s", "a", "y", 2);

        let blob = storage.get("pageflow:s").unwrap().unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(
            value,
            json!([
                { "page_id": "b", "state": { "x": 1 } },
                { "page_id": "a", "state": { "y": 2 } },
            ])
        );
    }
}

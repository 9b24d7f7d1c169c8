//! Page-scoped state values shared by the resolver and the state store.
//!
//! State is namespaced per page: every value lives under a `(page, key)`
//! pair and two pages may use the same key without overriding each other.
//! [`AccumulatedState::flatten`] exists for callers that explicitly want a
//! single last-write-wins map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::node::NodeId;

/// Key/value state local to one page of one session.
pub type PageState = Map<String, Value>;

/// State recorded for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// The page this state belongs to.
    pub page_id: NodeId,
    /// The page's key/value state.
    #[serde(default)]
    pub state: PageState,
}

impl PageEntry {
    /// Creates an entry with empty state.
    #[must_use]
    pub fn empty(page_id: impl Into<NodeId>) -> Self {
        Self {
            page_id: page_id.into(),
            state: PageState::new(),
        }
    }
}

/// A view over all page states of one session, in first-write order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulatedState {
    entries: Vec<PageEntry>,
}

impl AccumulatedState {
    /// Creates an empty accumulated state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulated state from page entries.
    #[must_use]
    pub fn from_entries(entries: Vec<PageEntry>) -> Self {
        Self { entries }
    }

    /// Returns the state of a single page.
    #[must_use]
    pub fn page(&self, page: &str) -> Option<&PageState> {
        self.entries
            .iter()
            .find(|entry| entry.page_id == page)
            .map(|entry| &entry.state)
    }

    /// Returns one value from one page's namespace.
    #[must_use]
    pub fn get(&self, page: &str, key: &str) -> Option<&Value> {
        self.page(page).and_then(|state| state.get(key))
    }

    /// Upserts a value, creating the page entry if needed.
    pub fn set(
        &mut self,
        page: impl Into<NodeId>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let page = page.into();
        let state = match self.entries.iter().position(|entry| entry.page_id == page) {
            Some(index) => &mut self.entries[index].state,
            None => {
                self.entries.push(PageEntry::empty(page));
                let last = self.entries.len() - 1;
                &mut self.entries[last].state
            }
        };
        state.insert(key.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with_value(
        mut self,
        page: impl Into<NodeId>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.set(page, key, value);
        self
    }

    /// Returns the page ids with recorded state, in first-write order.
    pub fn pages(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.iter().map(|entry| &entry.page_id)
    }

    /// Returns the underlying entries.
    #[must_use]
    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Consumes the view and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<PageEntry> {
        self.entries
    }

    /// Returns the number of pages with recorded state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no page has recorded state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges every page into one map.
    ///
    /// Later entries override earlier ones on key collision.
    #[must_use]
    pub fn flatten(&self) -> PageState {
        let mut merged = PageState::new();
        for entry in &self.entries {
            for (key, value) in &entry.state {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

//! Location adapters.
//!
//! The controller treats the location (a browser URL, a deep link, a CLI
//! argument set) as the source of truth for the current page. It only reads
//! and writes named parameters; how they are encoded is the adapter's
//! business.

use std::collections::BTreeMap;

/// All parameters of a location.
pub type Params = BTreeMap<String, String>;

/// A history-backed location holding named string parameters.
pub trait Location {
    /// Returns the value of one parameter.
    fn get_param(&self, key: &str) -> Option<String>;

    /// Sets one parameter as a new history entry.
    fn set_param(&mut self, key: &str, value: &str);

    /// Sets one parameter in place, without a new history entry.
    fn replace_param(&mut self, key: &str, value: &str);

    /// Returns every parameter.
    fn get_all_params(&self) -> Params;

    /// Replaces every parameter at once, without a new history entry.
    fn replace_params(&mut self, params: Params);

    /// Moves one entry back in history.
    fn back(&mut self);
}

/// One operation recorded by [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOp {
    /// A new entry was pushed with these parameters.
    Push(Params),
    /// The current entry was rewritten to these parameters.
    Replace(Params),
    /// The cursor moved one entry back.
    Back,
    /// The cursor moved one entry forward.
    Forward,
}

/// An in-memory history stack, behaving like a browser session history.
///
/// Pushing discards every entry after the cursor. [`log`](Self::log) records
/// every operation so callers can check how navigation was applied.
///
/// # Example
///
/// ```
/// use pageflow_controller::location::{Location, MemoryHistory};
///
/// let mut history = MemoryHistory::new();
/// history.set_param("page", "a");
/// history.set_param("page", "b");
/// history.back();
///
/// assert_eq!(history.get_param("page").as_deref(), Some("a"));
/// assert!(history.can_go_forward());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Params>,
    cursor: usize,
    log: Vec<HistoryOp>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistory {
    /// Creates a history with one empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self::from_params(Params::new())
    }

    /// Creates a history whose only entry holds `params`.
    #[must_use]
    pub fn from_params(params: Params) -> Self {
        Self {
            entries: vec![params],
            cursor: 0,
            log: Vec::new(),
        }
    }

    /// Builder form of the initial entry: adds one parameter to it.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries[self.cursor].insert(key.into(), value.into());
        self
    }

    /// Returns the parameters of the current entry.
    #[must_use]
    pub fn current(&self) -> &Params {
        &self.entries[self.cursor]
    }

    /// Returns every entry in the stack, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Params] {
        &self.entries
    }

    /// Returns the values of `key` across the stack, oldest first.
    #[must_use]
    pub fn values(&self, key: &str) -> Vec<Option<&str>> {
        self.entries
            .iter()
            .map(|params| params.get(key).map(String::as_str))
            .collect()
    }

    /// Returns the cursor position in the stack.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the number of entries in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every operation applied so far.
    #[must_use]
    pub fn log(&self) -> &[HistoryOp] {
        &self.log
    }

    /// Returns true if there is an entry before the cursor.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there is an entry after the cursor.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Moves one entry forward. Does nothing at the end of the stack.
    pub fn forward(&mut self) {
        if self.can_go_forward() {
            self.cursor += 1;
            self.log.push(HistoryOp::Forward);
        }
    }

    /// Pushes a new entry with the given parameters.
    pub fn push(&mut self, params: Params) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(params.clone());
        self.cursor = self.entries.len() - 1;
        self.log.push(HistoryOp::Push(params));
    }

    /// Rewrites the current entry.
    pub fn replace(&mut self, params: Params) {
        self.entries[self.cursor] = params.clone();
        self.log.push(HistoryOp::Replace(params));
    }
}

impl Location for MemoryHistory {
    fn get_param(&self, key: &str) -> Option<String> {
        self.current().get(key).cloned()
    }

    fn set_param(&mut self, key: &str, value: &str) {
        let mut params = self.current().clone();
        params.insert(key.to_owned(), value.to_owned());
        self.push(params);
    }

    fn replace_param(&mut self, key: &str, value: &str) {
        let mut params = self.current().clone();
        params.insert(key.to_owned(), value.to_owned());
        self.replace(params);
    }

    fn get_all_params(&self) -> Params {
        self.current().clone()
    }

    fn replace_params(&mut self, params: Params) {
        self.replace(params);
    }

    /// Does nothing at the start of the stack.
    fn back(&mut self) {
        if self.can_go_back() {
            self.cursor -= 1;
            self.log.push(HistoryOp::Back);
        }
    }
}

//! The flow controller.
//!
//! [`FlowController`] ties a [`Graph`], a [`StateStore`] and a [`Location`]
//! together. The location is the source of truth for the displayed page:
//! every navigation writes to it first, and every external change to it
//! (back/forward, edited links) is reconciled through
//! [`handle_location_change`](FlowController::handle_location_change).
//!
//! # Lifecycle
//!
//! ```text
//! Validating ──start()──► Ready(page) ◄──► Expired | NotFound
//! ```
//!
//! - **`start()`** reads the location once. A missing session id is generated
//!   and a missing page id snaps to the entry point, both written back with
//!   a replace.
//! - Landing on the entry point is always valid. Landing deeper requires
//!   existing session state, otherwise the link is treated as expired.
//! - Whenever the displayed page changes and the new page should be skipped,
//!   the controller walks forward to the first renderable page and replaces
//!   the location, so skipped pages are never shown.

use std::sync::Arc;

use pageflow_graph::graph::Graph;
use pageflow_graph::node::{Node, NodeId};
use pageflow_graph::resolver::{
    get_next_page, get_previous_page, next_non_skipped, resolve_next, should_skip,
};
use pageflow_graph::state::{AccumulatedState, PageState};
use pageflow_store::StateStore;
use serde_json::Value;

use crate::config::FlowConfig;
use crate::hooks::{PageChange, PageChangeHooks};
use crate::location::Location;
use crate::status::{EXPIRED_PAGE_ID, FlowStatus, NOT_FOUND_PAGE_ID, View};

/// Page and session ids read from the location after normalization.
struct LocationSnapshot {
    page: Option<String>,
    session_id: String,
}

/// Drives a user through a page graph, keeping the location in sync.
///
/// # Example
///
/// ```
/// use pageflow_controller::prelude::*;
/// use pageflow_graph::prelude::*;
///
/// let graph = Graph::build(
///     [
///         Node::new("a").with_next("b"),
///         Node::new("b").with_previous("a"),
///     ],
///     None,
/// )
/// .unwrap();
///
/// let mut flow = FlowController::new(graph, MemoryHistory::new());
/// flow.start();
/// assert_eq!(flow.current_page().map(NodeId::as_str), Some("a"));
///
/// flow.write("a", "email", "ada@example.com");
/// assert_eq!(flow.advance().as_deref(), Some("b"));
///
/// flow.retreat();
/// assert_eq!(flow.current_page().map(NodeId::as_str), Some("a"));
/// ```
pub struct FlowController<L: Location> {
    graph: Arc<Graph>,
    location: L,
    store: Arc<StateStore>,
    config: FlowConfig,
    hooks: PageChangeHooks,
    status: FlowStatus,
    session_id: Option<String>,
    pre_registered: bool,
}

impl<L: Location + core::fmt::Debug> core::fmt::Debug for FlowController<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlowController")
            .field("status", &self.status)
            .field("session_id", &self.session_id)
            .field("location", &self.location)
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl<L: Location> FlowController<L> {
    /// Creates a controller with a fresh in-memory store and default config.
    ///
    /// Nothing is read from the location until [`start`](Self::start).
    #[must_use]
    pub fn new(graph: impl Into<Arc<Graph>>, location: L) -> Self {
        Self {
            graph: graph.into(),
            location,
            store: Arc::new(StateStore::new()),
            config: FlowConfig::default(),
            hooks: PageChangeHooks::new(),
            status: FlowStatus::Validating,
            session_id: None,
            pre_registered: false,
        }
    }

    /// Uses the given state store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<StateStore>) -> Self {
        self.store = store;
        self
    }

    /// Uses the given configuration.
    #[must_use]
    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the state store.
    #[must_use]
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Returns the location.
    #[must_use]
    pub fn location(&self) -> &L {
        &self.location
    }

    /// Returns the location for external changes.
    ///
    /// Call [`handle_location_change`](Self::handle_location_change) after
    /// changing it.
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    /// Returns the page-change observer registry.
    #[must_use]
    pub fn hooks(&self) -> &PageChangeHooks {
        &self.hooks
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> &FlowStatus {
        &self.status
    }

    /// Returns the displayed page.
    #[must_use]
    pub fn current_page(&self) -> Option<&NodeId> {
        self.status.page()
    }

    /// Returns the session id, once the location has been read.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns what the presenter should render.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        match &self.status {
            FlowStatus::Validating => View {
                page_id: None,
                node: None,
            },
            FlowStatus::Ready(page) => View {
                page_id: page.as_deref(),
                node: page.as_deref().and_then(|id| self.graph.get_node(id)),
            },
            FlowStatus::Expired => View {
                page_id: Some(EXPIRED_PAGE_ID),
                node: None,
            },
            FlowStatus::NotFound => View {
                page_id: Some(NOT_FOUND_PAGE_ID),
                node: None,
            },
        }
    }

    /// Returns the session's state across all pages.
    #[must_use]
    pub fn state(&self) -> AccumulatedState {
        self.session_id
            .as_deref()
            .map(|sid| self.store.get_all_state(sid))
            .unwrap_or_default()
    }

    /// Returns true if [`advance`](Self::advance) would move.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.current_page()
            .is_some_and(|page| get_next_page(&self.graph, page, &self.state()).is_some())
    }

    /// Returns true if the graph defines a renderable page before this one.
    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.current_page()
            .is_some_and(|page| get_previous_page(&self.graph, page, &self.state()).is_some())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Page state
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns one value from one page's state.
    #[must_use]
    pub fn read(&self, page: &str, key: &str) -> Option<Value> {
        let sid = self.session_id.as_deref()?;
        self.store.read(sid, page, key)
    }

    /// Returns one page's state.
    #[must_use]
    pub fn page_state(&self, page: &str) -> PageState {
        self.session_id
            .as_deref()
            .map(|sid| self.store.get_page_state(sid, page))
            .unwrap_or_default()
    }

    /// Writes one value into one page's state.
    ///
    /// Ignored with a warning before the session is known.
    pub fn write(&self, page: &str, key: impl Into<String>, value: impl Into<Value>) {
        match self.session_id.as_deref() {
            Some(sid) => self.store.set_key(sid, page, key, value),
            None => tracing::warn!(page = %page, "write ignored, flow has not been started"),
        }
    }

    /// Writes several values into one page's state at once.
    ///
    /// Ignored with a warning before the session is known.
    pub fn write_batch<I, K, V>(&self, page: &str, updates: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        match self.session_id.as_deref() {
            Some(sid) => self.store.set_batch(sid, page, updates),
            None => tracing::warn!(page = %page, "write ignored, flow has not been started"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry validation & reconciliation
    // ─────────────────────────────────────────────────────────────────────────

    /// Reads the location and resolves the initial status.
    pub fn start(&mut self) -> &FlowStatus {
        let snapshot = self.read_location();

        let status = match snapshot.page {
            None => FlowStatus::Ready(None),
            Some(page) if self.graph.is_entry_point(&page) => {
                self.pre_register_new_session(&snapshot.session_id);
                FlowStatus::Ready(Some(NodeId::from(page)))
            }
            Some(page) if !self.graph.contains(&page) => FlowStatus::NotFound,
            Some(_) if !self.store.has_session(&snapshot.session_id) => FlowStatus::Expired,
            Some(page) => FlowStatus::Ready(Some(NodeId::from(page))),
        };

        tracing::debug!(session = %snapshot.session_id, status = ?status, "flow started");
        match status {
            FlowStatus::Ready(Some(page)) => self.adopt(page),
            other => self.set_status(other),
        }
        &self.status
    }

    /// Reconciles the controller with an externally changed location.
    ///
    /// Runs [`start`](Self::start) if the location was never read.
    pub fn handle_location_change(&mut self) -> &FlowStatus {
        if self.status == FlowStatus::Validating {
            return self.start();
        }

        let snapshot = self.read_location();
        let Some(page) = snapshot.page else {
            self.set_status(FlowStatus::Ready(None));
            return &self.status;
        };

        if !self.graph.contains(&page) {
            self.set_status(FlowStatus::NotFound);
            return &self.status;
        }
        let is_entry = self.graph.is_entry_point(&page);
        if is_entry {
            self.pre_register_new_session(&snapshot.session_id);
        } else if !self.store.has_session(&snapshot.session_id) {
            self.set_status(FlowStatus::Expired);
            return &self.status;
        }

        let target = NodeId::from(page);
        match self.current_page().cloned() {
            Some(current) if current == target => {}
            Some(current) if should_skip(&self.graph, &target, &self.state()) => {
                self.redirect_skipped(&current, &target);
            }
            _ => self.adopt(target),
        }
        &self.status
    }

    /// Reads page and session ids, writing back whatever was missing.
    fn read_location(&mut self) -> LocationSnapshot {
        let mut params = self.location.get_all_params();
        let mut changed = false;

        let existing = params
            .get(&self.config.session_param)
            .filter(|id| !id.is_empty())
            .cloned();
        let session_id = existing.unwrap_or_else(|| {
            let generated = self.config.generate_session_id();
            tracing::debug!(session = %generated, "generated session id");
            params.insert(self.config.session_param.clone(), generated.clone());
            changed = true;
            generated
        });

        let mut page = params
            .get(&self.config.page_param)
            .filter(|page| !page.is_empty())
            .cloned();
        if page.is_none()
            && let Some(entry) = self.graph.entry_point()
        {
            params.insert(self.config.page_param.clone(), entry.to_string());
            page = Some(entry.to_string());
            changed = true;
        }

        if changed {
            self.location.replace_params(params);
        }
        self.session_id = Some(session_id.clone());
        LocationSnapshot { page, session_id }
    }

    fn pre_register_new_session(&mut self, session_id: &str) {
        if self.pre_registered || self.store.has_session(session_id) {
            return;
        }
        self.store.pre_register(&self.graph, session_id);
        self.pre_registered = true;
    }

    /// Handles the location landing on a page that should be skipped.
    fn redirect_skipped(&mut self, current: &NodeId, target: &NodeId) {
        let state = self.state();
        let backwards = self
            .graph
            .get_node(current)
            .is_some_and(|node| node.previous_fallback.as_ref() == Some(target))
            || get_previous_page(&self.graph, current, &state).as_ref() == Some(target);

        let redirect = if backwards {
            get_previous_page(&self.graph, target, &state)
        } else {
            get_next_page(&self.graph, target, &state)
        };

        match redirect {
            Some(page) => {
                tracing::debug!(
                    from = %target,
                    to = %page,
                    backwards,
                    "redirecting past skipped page"
                );
                self.location.replace_param(&self.config.page_param, &page);
                self.adopt(page);
            }
            None => {
                tracing::warn!(
                    page = %target,
                    backwards,
                    "no renderable page past skipped page, staying on current page"
                );
                self.location.replace_param(&self.config.page_param, current);
            }
        }
    }

    /// Makes `page` the displayed page, walking past it if it should be skipped.
    fn adopt(&mut self, page: NodeId) {
        let state = self.state();
        let page = if should_skip(&self.graph, &page, &state) {
            match next_non_skipped(&self.graph, &page, &state) {
                Some(next) => {
                    tracing::debug!(from = %page, to = %next, "adopted page is skipped, moving on");
                    self.location.replace_param(&self.config.page_param, &next);
                    next
                }
                None => {
                    tracing::warn!(page = %page, "skipped page has no renderable successor");
                    page
                }
            }
        } else {
            page
        };
        self.set_status(FlowStatus::Ready(Some(page)));
    }

    fn set_status(&mut self, status: FlowStatus) {
        if self.status == status {
            return;
        }
        let previous = self.current_page().cloned();
        self.status = status;

        let change = PageChange {
            current: self.current_page().cloned(),
            previous,
            state: self.state(),
        };
        tracing::debug!(
            current = ?change.current,
            previous = ?change.previous,
            status = ?self.status,
            "page changed"
        );
        self.hooks.invoke(&change);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves to the next renderable page.
    ///
    /// When pages are skipped on the way, the skipped step's history entry is
    /// rewritten to the final page, so going back never lands on it. Returns
    /// the new page, or `None` at a dead end.
    pub fn advance(&mut self) -> Option<NodeId> {
        let current = self.current_page()?.clone();
        let state = self.state();
        let direct = self
            .graph
            .get_node(&current)
            .and_then(|node| resolve_next(node, &state));
        let target = get_next_page(&self.graph, &current, &state)?;

        match direct {
            Some(direct) if direct != target => {
                tracing::debug!(
                    from = %current,
                    skipped = %direct,
                    to = %target,
                    "advancing over skipped pages"
                );
                self.location.set_param(&self.config.page_param, &direct);
                self.location.replace_param(&self.config.page_param, &target);
            }
            _ => self.location.set_param(&self.config.page_param, &target),
        }
        self.adopt(target);
        self.current_page().cloned()
    }

    /// Same as [`advance`](Self::advance), for a page that decides to skip
    /// itself after the fact.
    pub fn request_skip(&mut self) -> Option<NodeId> {
        self.advance()
    }

    /// Goes back one history entry and reconciles.
    pub fn retreat(&mut self) -> &FlowStatus {
        self.location.back();
        self.handle_location_change()
    }

    /// Jumps to any page of the graph, adding a history entry.
    ///
    /// Returns false if the page is not part of the graph.
    pub fn go_to(&mut self, page: &str) -> bool {
        self.jump(page, false)
    }

    /// Jumps to any page of the graph, replacing the current history entry.
    ///
    /// Returns false if the page is not part of the graph.
    pub fn skip_to(&mut self, page: &str) -> bool {
        self.jump(page, true)
    }

    fn jump(&mut self, page: &str, replace: bool) -> bool {
        let Some(node) = self.graph.get_node(page) else {
            tracing::warn!(page = %page, "cannot jump to a page outside the graph");
            return false;
        };
        let target = node.id.clone();
        if replace {
            self.location.replace_param(&self.config.page_param, &target);
        } else {
            self.location.set_param(&self.config.page_param, &target);
        }
        self.adopt(target);
        true
    }

    /// Clears the session's state. The displayed page does not change.
    pub fn complete(&mut self) {
        if let Some(sid) = self.session_id.as_deref() {
            tracing::debug!(session = %sid, "flow completed");
            self.store.clear_session(sid);
        }
    }

    /// Returns the node of the displayed page.
    #[must_use]
    pub fn current_node(&self) -> Option<&Node> {
        self.current_page().and_then(|page| self.graph.get_node(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::MemoryHistory;

    fn two_pages() -> Graph {
        Graph::build(
            [Node::new("a").with_next("b"), Node::new("b").with_previous("a")],
            None,
        )
        .unwrap()
    }

    #[test]
    fn new_controller_is_validating() {
        let flow = FlowController::new(two_pages(), MemoryHistory::new());
        assert_eq!(flow.status(), &FlowStatus::Validating);
        assert!(flow.view().page_id.is_none());
        assert!(flow.session_id().is_none());
    }

    #[test]
    fn write_before_start_is_ignored() {
        let flow = FlowController::new(two_pages(), MemoryHistory::new());
        flow.write("a", "k", 1);
        assert_eq!(flow.read("a", "k"), None);
    }

    #[test]
    fn empty_location_is_written_back_in_one_replace() {
        let mut flow = FlowController::new(two_pages(), MemoryHistory::new());
        flow.start();

        let history = flow.location();
        assert_eq!(history.len(), 1);
        assert_eq!(history.log().len(), 1);
        assert_eq!(history.get_param("page").as_deref(), Some("a"));
        assert_eq!(history.get_param("id").as_deref(), flow.session_id());
    }

    #[test]
    fn view_of_ready_page_includes_node() {
        let mut flow = FlowController::new(two_pages(), MemoryHistory::new());
        flow.start();

        let view = flow.view();
        assert_eq!(view.page_id, Some("a"));
        assert_eq!(view.node.map(|node| node.id.as_str()), Some("a"));
        assert!(!view.is_sentinel());
    }

    #[test]
    fn affordances_follow_the_graph() {
        let mut flow = FlowController::new(two_pages(), MemoryHistory::new());
        flow.start();
        assert!(flow.can_advance());
        assert!(!flow.can_retreat());

        flow.advance();
        assert!(!flow.can_advance());
        assert!(flow.can_retreat());
        assert_eq!(flow.advance(), None);
    }
}

//! Controller status and the presenter view.

use pageflow_graph::node::{Node, NodeId};

/// Page id rendered when a deep link has no session state behind it.
pub const EXPIRED_PAGE_ID: &str = "__expired__";

/// Page id rendered when the location names a page outside the graph.
pub const NOT_FOUND_PAGE_ID: &str = "__not_found__";

/// Where the controller stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowStatus {
    /// The location has not been read yet.
    #[default]
    Validating,
    /// A page is displayed, or none when the graph has no entry point.
    Ready(Option<NodeId>),
    /// The location points past the entry point of a session with no state.
    Expired,
    /// The location points at a page that is not part of the graph.
    NotFound,
}

impl FlowStatus {
    /// Returns the displayed page, if any.
    #[must_use]
    pub fn page(&self) -> Option<&NodeId> {
        match self {
            FlowStatus::Ready(page) => page.as_ref(),
            _ => None,
        }
    }

    /// Returns true for [`Expired`](Self::Expired) and [`NotFound`](Self::NotFound).
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, FlowStatus::Expired | FlowStatus::NotFound)
    }

    /// Returns true once the location has been read and a page adopted.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, FlowStatus::Ready(_))
    }
}

/// What the presenter should render.
///
/// Error states carry one of the sentinel ids and no node.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// The page id to render, or a sentinel.
    pub page_id: Option<&'a str>,
    /// The graph node behind `page_id`.
    pub node: Option<&'a Node>,
}

impl View<'_> {
    /// Returns true if the view shows one of the sentinel pages.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self.page_id, Some(EXPIRED_PAGE_ID | NOT_FOUND_PAGE_ID))
    }
}

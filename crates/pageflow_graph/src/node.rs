//! Page nodes for flow graphs.
//!
//! A node is one step of a flow. It knows how to compute its successor
//! ([`Next`]), which page to fall back to when going backwards, and whether it
//! should be bypassed under the current accumulated state.

use core::borrow::Borrow;
use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::predicate::{BoxedPredicate, BoxedRouter, Predicate, Router};
use crate::state::AccumulatedState;

/// Unique identifier for a page in the graph.
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates a node ID from a specific string value.
    #[must_use]
    pub fn from_string(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for NodeId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// How a node determines its successor.
pub enum Next {
    /// Always continue to the given page.
    Fixed(NodeId),
    /// Ask a router, which may decide there is no next page.
    Computed(BoxedRouter),
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Next::Fixed(id) => f.debug_tuple("Fixed").field(id).finish(),
            Next::Computed(router) => f.debug_tuple("Computed").field(router).finish(),
        }
    }
}

/// A page in the flow graph.
///
/// Edges are not stored separately: the successor is computed from
/// [`Node::next`] at resolution time and the predecessor is the explicit
/// [`Node::previous_fallback`] link.
pub struct Node {
    /// Unique identifier for this page.
    pub id: NodeId,
    /// Successor rule, if the page has one.
    pub next: Option<Next>,
    /// Page to return to when navigating backwards.
    pub previous_fallback: Option<NodeId>,
    /// Decides whether this page is bypassed.
    pub should_skip: Option<BoxedPredicate>,
}

impl Node {
    /// Creates a page with no successor, no fallback and no skip predicate.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            next: None,
            previous_fallback: None,
            should_skip: None,
        }
    }

    /// Sets a fixed successor.
    #[must_use]
    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next = Some(Next::Fixed(next.into()));
        self
    }

    /// Sets a successor computed from the accumulated state.
    ///
    /// The router may return `None` to signal the end of the flow.
    ///
    /// # Example
    ///
    /// ```
    /// use pageflow_graph::node::Node;
    ///
    /// let node = Node::new("plan").with_computed_next(|state| {
    ///     let premium = state
    ///         .get("plan", "tier")
    ///         .and_then(|v| v.as_str())
    ///         .is_some_and(|tier| tier == "premium");
    ///     Some(if premium { "extras" } else { "summary" })
    /// });
    /// assert!(node.next.is_some());
    /// ```
    #[must_use]
    pub fn with_computed_next<F, R>(mut self, router: F) -> Self
    where
        F: Fn(&AccumulatedState) -> Option<R> + Send + Sync + 'static,
        R: Into<NodeId> + 'static,
    {
        self.next = Some(Next::Computed(Box::new(Router::new(router))));
        self
    }

    /// Sets the page to fall back to when navigating backwards.
    #[must_use]
    pub fn with_previous(mut self, previous: impl Into<NodeId>) -> Self {
        self.previous_fallback = Some(previous.into());
        self
    }

    /// Sets the skip predicate.
    #[must_use]
    pub fn with_skip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AccumulatedState) -> bool + Send + Sync + 'static,
    {
        self.should_skip = Some(Box::new(Predicate::new(predicate)));
        self
    }

    /// Returns the fixed successor, if the successor is not computed.
    #[must_use]
    pub fn fixed_next(&self) -> Option<&NodeId> {
        match &self.next {
            Some(Next::Fixed(id)) => Some(id),
            _ => None,
        }
    }

    /// Returns true if this page carries a skip predicate.
    #[must_use]
    pub fn has_skip_predicate(&self) -> bool {
        self.should_skip.is_some()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("next", &self.next)
            .field("previous_fallback", &self.previous_fallback)
            .field("has_skip_predicate", &self.has_skip_predicate())
            .finish()
    }
}

//! Page graph primitives for pageflow.
//!
//! `pageflow_graph` models a multi-step flow as a directed graph of pages
//! whose ordering may depend on state the user has entered so far, and
//! resolves where to go next (or back) when some pages are skipped.
//!
//! # Core Concepts
//!
//! - [`Graph`] - Immutable-after-build set of pages plus an entry point
//! - [`Node`] - One page: successor rule, previous fallback, skip predicate
//! - [`Next`] - Fixed or computed successor
//! - [`AccumulatedState`] - Per-page namespaced state the rules read from
//! - [`resolver`] - Pure next/previous resolution with cycle protection
//!
//! # Example
//!
//! ```
//! use pageflow_graph::prelude::*;
//!
//! let graph = Graph::build(
//!     [
//!         Node::new("a").with_next("b"),
//!         Node::new("b").with_previous("a").with_computed_next(|state| {
//!             let user_type = state.get("b", "userType").and_then(|v| v.as_str());
//!             let premium = user_type == Some("premium");
//!             Some(if premium { "e" } else { "c" })
//!         }),
//!         Node::new("c").with_previous("b").with_next("d"),
//!         Node::new("e").with_previous("b").with_next("d"),
//!         Node::new("d").with_previous("c"),
//!     ],
//!     None,
//! )
//! .unwrap();
//!
//! let state = AccumulatedState::new();
//! assert_eq!(get_next_page(&graph, "b", &state), Some("c".into()));
//!
//! let premium = AccumulatedState::new().with_value("b", "userType", "premium");
//! assert_eq!(get_next_page(&graph, "b", &premium), Some("e".into()));
//! ```

/// Graph structure, builder API and validation.
pub mod graph;

/// Page nodes and identifiers.
pub mod node;

/// Skip predicates and next-page routers.
pub mod predicate;

/// Skip-aware next/previous resolution.
pub mod resolver;

/// Page state and accumulated state.
pub mod state;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::graph::{ConfigurationError, Graph, GraphBuilder, ValidationError};
    pub use crate::node::{Next, Node, NodeId};
    pub use crate::predicate::{
        BoxedPredicate, BoxedRouter, ErasedPredicate, ErasedRouter, Predicate, Router,
    };
    pub use crate::resolver::{
        get_next_page, get_previous_page, next_non_skipped, previous_non_skipped, resolve_next,
        should_skip,
    };
    pub use crate::state::{AccumulatedState, PageEntry, PageState};
}

// Re-export key types at crate root for convenience
pub use graph::{ConfigurationError, Graph, GraphBuilder, ValidationError};
pub use node::{Next, Node, NodeId};
pub use state::{AccumulatedState, PageEntry, PageState};

//! Shared test utilities for `pageflow_graph` integration tests.
//!
//! Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use pageflow_graph::graph::Graph;
use pageflow_graph::node::Node;
use pageflow_graph::state::AccumulatedState;
use serde_json::json;

// ═══════════════════════════════════════════════════════════════════════════════
// GRAPH FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

/// `a → b`, `b → (premium ? e : c)`, `c → d`, `e → d`.
///
/// The branch decision reads `userType` from page `b`'s namespace.
pub fn branch_graph() -> Graph {
    Graph::build(
        [
            Node::new("a").with_next("b"),
            Node::new("b").with_previous("a").with_computed_next(|state| {
                if is_premium(state) {
                    Some("e")
                } else {
                    Some("c")
                }
            }),
            Node::new("c").with_previous("b").with_next("d"),
            Node::new("e").with_previous("b").with_next("d"),
            Node::new("d").with_previous("c"),
        ],
        None,
    )
    .expect("branch graph is well formed")
}

/// `a → b → c → d` where `c` is skipped when page `b` recorded `skip: true`.
pub fn skip_graph() -> Graph {
    Graph::build(
        [
            Node::new("a").with_next("b"),
            Node::new("b").with_previous("a").with_next("c"),
            Node::new("c")
                .with_previous("b")
                .with_next("d")
                .with_skip(skip_requested),
            Node::new("d").with_previous("c"),
        ],
        None,
    )
    .expect("skip graph is well formed")
}

/// `a → b → c` where `b` and `c` always skip and `c` loops back to `b`.
pub fn skip_cycle_graph() -> Graph {
    Graph::build(
        [
            Node::new("a").with_next("b"),
            Node::new("b").with_next("c").with_previous("c").with_skip(|_| true),
            Node::new("c").with_next("b").with_previous("b").with_skip(|_| true),
        ],
        None,
    )
    .expect("cycle graph is well formed")
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATE HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn is_premium(state: &AccumulatedState) -> bool {
    state.get("b", "userType") == Some(&json!("premium"))
}

pub fn skip_requested(state: &AccumulatedState) -> bool {
    state.get("b", "skip") == Some(&json!(true))
}

pub fn premium_state() -> AccumulatedState {
    AccumulatedState::new().with_value("b", "userType", "premium")
}

pub fn skip_state() -> AccumulatedState {
    AccumulatedState::new().with_value("b", "skip", true)
}

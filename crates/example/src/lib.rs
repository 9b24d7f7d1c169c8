//! Example checkout flow built with pageflow.
//!
//! # Flow
//!
//! ```text
//! cart ──► account ──┬─► shipping ──┐
//!                    │              ├─► gift ──► review
//!                    └─► express ───┘
//! ```
//!
//! - `account` routes premium customers to `express`.
//! - `gift` is skipped unless the cart asked for gift wrapping.

use pageflow_graph::graph::{ConfigurationError, Graph};
use pageflow_graph::node::Node;
use pageflow_graph::state::AccumulatedState;
use serde_json::Value;

/// Returns true if the account page recorded a premium customer.
#[must_use]
pub fn is_premium(state: &AccumulatedState) -> bool {
    state.get("account", "userType").and_then(Value::as_str) == Some("premium")
}

/// Returns true if the cart page asked for gift wrapping.
#[must_use]
pub fn wants_gift(state: &AccumulatedState) -> bool {
    state.get("cart", "gift").and_then(Value::as_bool) == Some(true)
}

/// Builds the checkout graph.
///
/// # Errors
///
/// Never in practice; page ids are unique.
pub fn checkout_graph() -> Result<Graph, ConfigurationError> {
    Graph::builder()
        .add_page(Node::new("cart").with_next("account"))
        .add_page(
            Node::new("account").with_previous("cart").with_computed_next(|state| {
                Some(if is_premium(state) { "express" } else { "shipping" })
            }),
        )
        .add_page(Node::new("shipping").with_previous("account").with_next("gift"))
        .add_page(Node::new("express").with_previous("account").with_next("gift"))
        .add_page(
            Node::new("gift")
                .with_previous("shipping")
                .with_next("review")
                .with_skip(|state| !wants_gift(state)),
        )
        .add_page(Node::new("review").with_previous("gift"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageflow_graph::node::NodeId;
    use pageflow_graph::resolver::get_next_page;

    #[test]
    fn checkout_graph_is_valid() {
        let graph = checkout_graph().unwrap();
        assert!(graph.validate().is_ok());
        assert_eq!(graph.entry_point().map(NodeId::as_str), Some("cart"));
    }

    #[test]
    fn gift_is_skipped_by_default() {
        let graph = checkout_graph().unwrap();
        let state = AccumulatedState::new();
        assert_eq!(get_next_page(&graph, "shipping", &state), Some("review".into()));

        let gift = state.with_value("cart", "gift", true);
        assert_eq!(get_next_page(&graph, "shipping", &gift), Some("gift".into()));
    }
}

//! Walks the example checkout flow through an in-memory history.
//!
//! # Usage
//!
//! ```bash
//! flow-demo [premium] [gift]
//! ```

use std::sync::Arc;

use example::checkout_graph;
use pageflow_controller::hooks::PageChange;
use pageflow_controller::location::MemoryHistory;
use pageflow_controller::tracing_setup::{TracingFormat, TracingSetup};
use pageflow_controller::FlowController;
use pageflow_store::{MemoryStorage, StateStore};
use tracing::Level;

fn main() {
    TracingSetup::new()
        .with_level(Level::INFO)
        .with_format(TracingFormat::Compact)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let premium = args.iter().any(|arg| arg == "premium");
    let gift = args.iter().any(|arg| arg == "gift");

    let graph = match checkout_graph() {
        Ok(graph) => graph,
        Err(err) => {
            tracing::error!(error = %err, "invalid checkout graph");
            std::process::exit(1);
        }
    };

    let store = Arc::new(StateStore::with_storage(MemoryStorage::new()).with_prefix("checkout:"));
    let mut flow = FlowController::new(graph, MemoryHistory::new()).with_store(store);
    if let Err(err) = flow.hooks().register_observer("log", |change: &PageChange| {
        tracing::info!(
            current = ?change.current.as_deref(),
            previous = ?change.previous.as_deref(),
            pages_with_state = change.state.len(),
            "page changed"
        );
    }) {
        tracing::error!(error = %err, "failed to register observer");
    }

    flow.start();
    flow.write("cart", "gift", gift);
    flow.advance();
    flow.write("account", "userType", if premium { "premium" } else { "standard" });

    while flow.can_advance() {
        flow.advance();
    }
    flow.retreat();
    flow.advance();

    tracing::info!(
        session = ?flow.session_id(),
        history = ?flow.location().values("page"),
        "checkout reached the review page"
    );
    flow.complete();
}

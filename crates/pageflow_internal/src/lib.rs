//! # pageflow Internal Library
//!
//! Re-exports the core pageflow crates for convenience.

/// Layer 1: page graph and skip-aware navigation resolution.
pub use pageflow_graph;

/// Layer 2: session-scoped page state persistence.
pub use pageflow_store;

/// Layer 3: location-synchronized flow controller.
pub use pageflow_controller;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use pageflow_controller::prelude::*;
    pub use pageflow_graph::prelude::*;
    pub use pageflow_store::{MemoryStorage, StateStore, Storage, StorageError};
}

//! Session state persistence for pageflow.
//!
//! [`StateStore`] keeps one ordered list of page entries per session and
//! mirrors it into a pluggable [`Storage`] medium. Storage failures never
//! surface to callers: they are logged and the store carries on in memory.
//!
//! # Example
//!
//! ```
//! use pageflow_graph::prelude::*;
//! use pageflow_store::{MemoryStorage, StateStore};
//!
//! let graph = Graph::build(
//!     [Node::new("a").with_next("b"), Node::new("b").with_previous("a")],
//!     None,
//! )
//! .unwrap();
//!
//! let store = StateStore::with_storage(MemoryStorage::new());
//! store.pre_register(&graph, "s1");
//! store.set_key("s1", "b", "plan", "premium");
//!
//! let upto_a = store.get_state_up_to(&graph, "s1", "a");
//! assert_eq!(upto_a.get("b", "plan"), None);
//! ```

/// Persistence error types.
pub mod error;

/// Session-scoped state store.
pub mod store;

/// Key-value storage media.
pub mod storage;

pub use error::PersistenceError;
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::{DEFAULT_PREFIX, StateStore};

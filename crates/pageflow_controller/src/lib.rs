//! Location-synchronized flow control for pageflow.
//!
//! [`FlowController`] is the single stateful object an application talks to.
//! It reads the current page and session from a [`Location`], validates deep
//! links, keeps skipped pages out of the history, stores page state through a
//! [`StateStore`](pageflow_store::StateStore) and notifies observers when the
//! displayed page changes.
//!
//! # Core Concepts
//!
//! - [`FlowController`] - Entry validation, reconciliation and navigation
//! - [`Location`] - Parameter-based history adapter; [`MemoryHistory`] in-process
//! - [`FlowStatus`] - `Validating`, `Ready`, `Expired` or `NotFound`
//! - [`PageChangeHooks`] - Named observers fired after every page change
//! - [`FlowConfig`] - Parameter names and session id length

/// The flow controller.
pub mod controller;

/// Controller configuration.
pub mod config;

/// Page-change observers.
pub mod hooks;

/// Location adapters.
pub mod location;

/// Controller status and presenter view.
pub mod status;

/// Subscriber installation.
pub mod tracing_setup;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::FlowConfig;
    pub use crate::controller::FlowController;
    pub use crate::hooks::{HookRegistrationError, PageChange, PageChangeHooks};
    pub use crate::location::{HistoryOp, Location, MemoryHistory, Params};
    pub use crate::status::{EXPIRED_PAGE_ID, FlowStatus, NOT_FOUND_PAGE_ID, View};
    pub use crate::tracing_setup::{TracingFormat, TracingSetup};
}

// Re-export key types at crate root for convenience
pub use config::FlowConfig;
pub use controller::FlowController;
pub use hooks::{HookRegistrationError, PageChange, PageChangeHooks};
pub use location::{Location, MemoryHistory};
pub use status::{EXPIRED_PAGE_ID, FlowStatus, NOT_FOUND_PAGE_ID, View};

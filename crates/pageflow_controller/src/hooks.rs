//! Page-change observers.
//!
//! Observers are registered under a unique name and invoked in registration
//! order every time the controller's displayed page changes, after the new
//! location and state have been committed.
//!
//! ```
//! use pageflow_controller::hooks::{PageChange, PageChangeHooks};
//!
//! let hooks = PageChangeHooks::new();
//! hooks
//!     .register_observer("logger", |change: &PageChange| {
//!         tracing::info!(current = ?change.current, previous = ?change.previous, "page changed");
//!     })
//!     .unwrap();
//!
//! assert!(hooks.contains("logger"));
//! assert!(hooks.register_observer("logger", |_: &PageChange| {}).is_err());
//! ```

use core::fmt;

use pageflow_graph::node::NodeId;
use pageflow_graph::state::AccumulatedState;
use parking_lot::RwLock;

/// A change of the displayed page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChange {
    /// The page now displayed; `None` in an error state or with no entry point.
    pub current: Option<NodeId>,
    /// The page displayed before.
    pub previous: Option<NodeId>,
    /// The session's state at the time of the change.
    pub state: AccumulatedState,
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during observer registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookRegistrationError {
    /// An observer with this name is already registered.
    #[error("observer '{name}' already registered")]
    DuplicateName {
        /// The duplicate observer name.
        name: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// PageChangeHooks
// ─────────────────────────────────────────────────────────────────────────────

type BoxedObserver = Box<dyn Fn(&PageChange) + Send + Sync>;

struct ObserverEntry {
    name: String,
    observer: BoxedObserver,
}

/// Registry of page-change observers.
///
/// Uses interior mutability so observers can be added through a shared
/// reference to the controller.
#[derive(Default)]
pub struct PageChangeHooks {
    observers: RwLock<Vec<ObserverEntry>>,
}

impl fmt::Debug for PageChangeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .observers
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect();
        f.debug_struct("PageChangeHooks")
            .field("observers", &names)
            .finish()
    }
}

impl PageChangeHooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer under a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if the name is taken.
    pub fn register_observer<F>(
        &self,
        name: impl Into<String>,
        observer: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&PageChange) + Send + Sync + 'static,
    {
        let name = name.into();
        let mut observers = self.observers.write();

        if observers.iter().any(|entry| entry.name == name) {
            return Err(HookRegistrationError::DuplicateName { name });
        }

        observers.push(ObserverEntry {
            name,
            observer: Box::new(observer),
        });
        Ok(self)
    }

    /// Removes an observer. Returns false if no observer had that name.
    pub fn unregister(&self, name: &str) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|entry| entry.name != name);
        observers.len() != before
    }

    /// Invokes every observer in registration order.
    ///
    /// Observers must not register or unregister observers from within the
    /// callback.
    pub fn invoke(&self, change: &PageChange) {
        for entry in self.observers.read().iter() {
            (entry.observer)(change);
        }
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns true if no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Checks if an observer with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.observers.read().iter().any(|entry| entry.name == name)
    }
}

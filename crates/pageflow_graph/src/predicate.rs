//! Skip predicates and next-page routers.
//!
//! Both evaluate against the [`AccumulatedState`] of a session and follow the
//! same type erasure pattern:
//!
//! - [`Predicate<F>`] - Typed closure returning `bool` (is this page skipped?)
//! - [`Router<F, R>`] - Typed closure returning the next page id, if any
//! - [`ErasedPredicate`] / [`ErasedRouter`] - Object-safe traits for storage
//! - [`BoxedPredicate`] / [`BoxedRouter`] - Type aliases for boxed values
//!
//! # Example
//!
//! ```
//! use pageflow_graph::predicate::{ErasedPredicate, Predicate};
//! use pageflow_graph::state::AccumulatedState;
//!
//! let skip_when_known = Predicate::new(|state: &AccumulatedState| {
//!     state.get("account", "email").is_some()
//! });
//!
//! let state = AccumulatedState::new().with_value("account", "email", "a@b.c");
//! assert!(skip_when_known.evaluate(&state));
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::node::NodeId;
use crate::state::AccumulatedState;

/// Object-safe trait for type-erased skip predicates.
pub trait ErasedPredicate: Send + Sync {
    /// Evaluates the predicate against the accumulated state.
    fn evaluate(&self, state: &AccumulatedState) -> bool;
}

impl fmt::Debug for dyn ErasedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedPredicate").finish_non_exhaustive()
    }
}

/// Type alias for boxed predicates stored in graph nodes.
pub type BoxedPredicate = Box<dyn ErasedPredicate>;

/// Object-safe trait for type-erased next-page routers.
///
/// Routers generalize a fixed successor: they inspect the accumulated state
/// and name the page to continue to, or `None` when the flow ends here.
pub trait ErasedRouter: Send + Sync {
    /// Computes the next page id from the accumulated state.
    fn route(&self, state: &AccumulatedState) -> Option<NodeId>;
}

impl fmt::Debug for dyn ErasedRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedRouter").finish_non_exhaustive()
    }
}

/// Type alias for boxed routers stored in graph nodes.
pub type BoxedRouter = Box<dyn ErasedRouter>;

/// A typed predicate over the accumulated state.
pub struct Predicate<F> {
    func: F,
}

impl<F> Predicate<F>
where
    F: Fn(&AccumulatedState) -> bool + Send + Sync + 'static,
{
    /// Creates a new predicate from a closure.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ErasedPredicate for Predicate<F>
where
    F: Fn(&AccumulatedState) -> bool + Send + Sync + 'static,
{
    fn evaluate(&self, state: &AccumulatedState) -> bool {
        (self.func)(state)
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

/// A typed router that returns the next page based on accumulated state.
///
/// # Type Parameters
///
/// - `F`: The router closure type
/// - `R`: Anything convertible into a [`NodeId`] (`&str`, `String`, `NodeId`)
pub struct Router<F, R> {
    func: F,
    _marker: PhantomData<fn() -> R>,
}

impl<F, R> Router<F, R>
where
    F: Fn(&AccumulatedState) -> Option<R> + Send + Sync + 'static,
    R: Into<NodeId>,
{
    /// Creates a new router from a closure.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, R> ErasedRouter for Router<F, R>
where
    F: Fn(&AccumulatedState) -> Option<R> + Send + Sync + 'static,
    R: Into<NodeId>,
{
    fn route(&self, state: &AccumulatedState) -> Option<NodeId> {
        (self.func)(state).map(Into::into)
    }
}

impl<F, R> fmt::Debug for Router<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("target_type", &core::any::type_name::<R>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn predicate_evaluate_true() {
        let pred = Predicate::new(|state: &AccumulatedState| {
            state.get("b", "skip") == Some(&json!(true))
        });

        let state = AccumulatedState::new().with_value("b", "skip", true);
        assert!(pred.evaluate(&state));
    }

    #[test]
    fn predicate_evaluate_false_on_empty_state() {
        let pred = Predicate::new(|state: &AccumulatedState| state.get("b", "skip").is_some());
        assert!(!pred.evaluate(&AccumulatedState::new()));
    }

    #[test]
    fn boxed_predicate() {
        let pred: BoxedPredicate = Box::new(Predicate::new(|_: &AccumulatedState| true));
        assert!(pred.evaluate(&AccumulatedState::new()));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Router tests
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn router_returns_target() {
        let router = Router::new(|state: &AccumulatedState| {
            if state.get("b", "userType") == Some(&json!("premium")) {
                Some("e")
            } else {
                Some("c")
            }
        });

        assert_eq!(router.route(&AccumulatedState::new()), Some(NodeId::from("c")));

        let premium = AccumulatedState::new().with_value("b", "userType", "premium");
        assert_eq!(router.route(&premium), Some(NodeId::from("e")));
    }

    #[test]
    fn router_may_end_the_flow() {
        let router = Router::new(|_: &AccumulatedState| None::<String>);
        assert_eq!(router.route(&AccumulatedState::new()), None);
    }

    #[test]
    fn boxed_router_debug() {
        let router: BoxedRouter = Box::new(Router::new(|_: &AccumulatedState| Some("x")));
        assert!(format!("{router:?}").contains("ErasedRouter"));
    }
}

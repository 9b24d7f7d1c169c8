//! Multi-step page flows with skippable steps, resumable state and
//! history-consistent navigation.

pub use pageflow_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use pageflow_internal::prelude::*;
}

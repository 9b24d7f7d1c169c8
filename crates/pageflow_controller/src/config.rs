//! Controller configuration.

use serde::{Deserialize, Deserializer, Serialize};

/// Default name of the location parameter carrying the page id.
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Default name of the location parameter carrying the session id.
pub const DEFAULT_SESSION_PARAM: &str = "id";

/// Default length of generated session ids.
pub const DEFAULT_SESSION_ID_LENGTH: usize = 10;

/// Configuration for a [`FlowController`](crate::FlowController).
///
/// Missing fields fall back to their defaults when deserializing.
///
/// # Example
///
/// ```
/// use pageflow_controller::FlowConfig;
///
/// let config = FlowConfig::default()
///     .with_page_param("step")
///     .with_session_id_length(16);
///
/// assert_eq!(config.page_param, "step");
/// assert_eq!(config.session_param, "id");
/// assert_eq!(config.generate_session_id().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Location parameter holding the current page id.
    pub page_param: String,
    /// Location parameter holding the session id.
    pub session_param: String,
    /// Length of session ids generated when the location has none.
    ///
    /// Zero is replaced by [`DEFAULT_SESSION_ID_LENGTH`].
    #[serde(deserialize_with = "deserialize_session_id_length")]
    pub session_id_length: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            page_param: DEFAULT_PAGE_PARAM.to_owned(),
            session_param: DEFAULT_SESSION_PARAM.to_owned(),
            session_id_length: DEFAULT_SESSION_ID_LENGTH,
        }
    }
}

impl FlowConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page id parameter name.
    #[must_use]
    pub fn with_page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    /// Sets the session id parameter name.
    #[must_use]
    pub fn with_session_param(mut self, name: impl Into<String>) -> Self {
        self.session_param = name.into();
        self
    }

    /// Sets the length of generated session ids.
    ///
    /// A length of zero falls back to [`DEFAULT_SESSION_ID_LENGTH`].
    #[must_use]
    pub fn with_session_id_length(mut self, length: usize) -> Self {
        self.session_id_length = non_zero_length(length);
        self
    }

    /// Generates a fresh session id.
    #[must_use]
    pub fn generate_session_id(&self) -> String {
        nanoid::nanoid!((non_zero_length(self.session_id_length)))
    }
}

fn non_zero_length(length: usize) -> usize {
    if length == 0 {
        DEFAULT_SESSION_ID_LENGTH
    } else {
        length
    }
}

fn deserialize_session_id_length<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    usize::deserialize(deserializer).map(non_zero_length)
}

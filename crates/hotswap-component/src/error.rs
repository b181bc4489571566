//! Error types for component code
//!
//! These errors originate inside user implementations (constructors, methods,
//! lifecycle hooks) or from member lookups. The swap core never wraps them.

/// Errors raised by component construction and invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// Constructor of an implementation failed
    #[error("construction of `{component}` failed: {reason}")]
    Construction {
        /// Component type name
        component: String,
        /// Failure description
        reason: String,
    },

    /// Invoked member does not exist
    #[error("`{component}` has no method `{method}`")]
    MethodNotFound {
        /// Component type name
        component: String,
        /// Requested method
        method: String,
    },

    /// Invoked member exists but is a plain field
    #[error("property `{property}` on `{component}` is not callable")]
    NotCallable {
        /// Component type name
        component: String,
        /// Requested property
        property: String,
    },

    /// Method rejected its arguments
    #[error("invalid arguments for `{method}`: {reason}")]
    InvalidArguments {
        /// Method name
        method: String,
        /// Failure description
        reason: String,
    },

    /// Any other failure raised by component code
    #[error("{0}")]
    Failed(String),
}

impl ComponentError {
    /// Create construction error
    #[inline]
    pub fn construction(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Create a free-form failure
    #[inline]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Check if error came from a member lookup rather than component code
    #[inline]
    #[must_use]
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Self::MethodNotFound { .. } | Self::NotCallable { .. })
    }
}

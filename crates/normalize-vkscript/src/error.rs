//! Errors raised while turning a Python function into VKScript.

/// Error that can occur at any stage of a translation.
///
/// Every variant is terminal for the call that produced it: nothing is
/// retried and no partial script is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptifyError {
    #[error("source unavailable for `{function}`: {reason}")]
    SourceUnavailable { function: String, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing binding for parameter `{parameter}`: every parameter after the reserved ones must be passed")]
    MissingBinding { parameter: String },

    #[error("no handler registered for `{kind}` nodes; VKScript may not support it")]
    UnsupportedConstruct { kind: String },

    #[error("operator `{operator}` has no VKScript equivalent")]
    UnsupportedOperator { operator: String },

    #[error("binding `{name}` has no VKScript literal form: {reason}")]
    UnrepresentableValue { name: String, reason: String },

    #[error("binding name `{name}` is not a valid VKScript identifier")]
    InvalidBindingName { name: String },
}

impl ScriptifyError {
    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedConstruct { kind: kind.into() }
    }

    pub(crate) fn operator(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
        }
    }
}

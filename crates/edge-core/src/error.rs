//! Core error types.

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the shared deployment primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A deferred value was read before the stage producing it completed.
    #[error("dependency order violation: {0} read before it was resolved")]
    Unresolved(&'static str),

    /// A deferred value was resolved twice within one composition.
    #[error("dependency order violation: {0} resolved more than once")]
    AlreadyResolved(&'static str),

    /// A stage was entered out of the linear order.
    #[error("dependency order violation: cannot enter {to} from {from}")]
    StageOrder { from: String, to: String },

    /// Invalid deployment configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

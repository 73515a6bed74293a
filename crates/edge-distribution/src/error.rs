//! Distribution assembly error types.

use thiserror::Error;

/// Result type for distribution assembly.
pub type DistributionResult<T> = Result<T, DistributionError>;

/// Errors that abort assembly of a distribution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    /// The certificate reference is not a certificate ARN or reference.
    #[error("malformed certificate reference: {0}")]
    MalformedCertificate(String),

    /// The function reference is not a function ARN or reference.
    #[error("malformed function reference: {0}")]
    MalformedFunction(String),
}

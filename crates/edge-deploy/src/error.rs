//! Deployment error types.

use edge_content::ContentError;
use edge_core::{CoreError, DeployStage};
use edge_distribution::DistributionError;
use thiserror::Error;

/// Result type for composition and apply.
pub type DeployResult<T> = Result<T, DeployError>;

/// Errors raised while composing or applying a desired-state graph.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// An apply engine failed; carried unmodified.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Two resources share an address, or a generated name is reserved.
    #[error("identity collision: {0}")]
    IdentityCollision(String),

    /// A resource references a graph resource that is not in the graph yet.
    #[error("dependency order violation: {node} references {target} before it exists")]
    ForwardReference { node: String, target: String },

    /// An earlier stage failed and the composition was abandoned.
    #[error("composition aborted: stage {0} failed")]
    Aborted(DeployStage),
}

/// Failure reported by an apply engine for one resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The upstream provider refused the resource.
    #[error("{address} rejected: {message}")]
    Rejected { address: String, message: String },

    /// The resource could not be written or read locally.
    #[error("{address}: I/O error: {message}")]
    Io { address: String, message: String },
}

impl ApplyError {
    /// Address of the failed resource.
    pub fn address(&self) -> &str {
        match self {
            ApplyError::Rejected { address, .. } | ApplyError::Io { address, .. } => address,
        }
    }
}

//! Core abstractions for edge single-page app deployments.
//!
//! This crate provides the fundamental types and traits:
//! - `SpaConfig` - Deployment inputs
//! - `IdentityProvider` - Injected source of unique name suffixes
//! - `ResourceAddress` / `Expr` - Graph addresses and attribute references
//! - `StorageOrigin`, `DistributionIdentity`, `FunctionIdentity` - Identities passed between stages
//! - `Deferred` - Two-phase values resolved by a later stage
//! - `DeployStage` / `StageObserver` - Composition lifecycle tracking

mod config;
mod deferred;
mod error;
mod identity;
mod lifecycle;
mod resource;

pub use config::*;
pub use deferred::*;
pub use error::*;
pub use identity::*;
pub use lifecycle::*;
pub use resource::*;

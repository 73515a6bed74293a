//! Access control for edge single-page app deployments.
//!
//! This crate provides:
//! - `AccessBinding` - Derives the policy scoping origin reads to one distribution
//! - `AccessPolicy` / `PolicyDocument` - The JSON-shaped policy statement list
//! - `BucketPolicy` - The policy attached to the origin
//! - `OriginAccessControl` - The signing identity used towards the origin
//!
//! # Example
//!
//! ```ignore
//! use edge_security::{AccessBinding, BucketPolicy};
//!
//! // The distribution identity must be final before derivation.
//! let policy = AccessBinding::derive(&origin, &distribution);
//! let attached = BucketPolicy::new(&origin, &policy);
//! println!("{}", attached.policy.to_json_pretty()?);
//! ```

mod access;
mod origin_access;

pub use access::*;
pub use origin_access::*;

//! Caching configuration for edge single-page app deployments.
//!
//! This crate provides:
//! - `CacheBehavior` - The fixed default cache behavior of a distribution
//! - `CachePolicy` - Object-level Cache-Control policies
//!
//! # Example
//!
//! ```ignore
//! use edge_cache::{CacheBehavior, CachePolicy};
//!
//! let behavior = CacheBehavior::default();
//! assert_eq!(behavior.default_ttl, 300);
//!
//! let header = CachePolicy::spa_objects().cache_control_header();
//! assert_eq!(header, "public, max-age=86400, s-maxage=300");
//! ```

mod behavior;
mod policy;

pub use behavior::*;
pub use policy::*;

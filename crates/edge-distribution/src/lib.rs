//! Edge distribution assembly for single-page app deployments.
//!
//! This crate provides:
//! - `assemble` - Builds the distribution configuration and its identity
//! - `DistributionConfig` - Origin, cache behavior, aliases, certificate, function association, geo-restriction
//! - `alias_records` - DNS alias records for custom domains
//! - `CertificateRef` / `FunctionRef` - Validated external references
//!
//! # Example
//!
//! ```ignore
//! use edge_distribution::{assemble, DistributionRequest};
//!
//! let request = DistributionRequest::new("site", origin)
//!     .with_aliases(["example.com"])
//!     .with_certificate("arn:aws:acm:us-east-1:123456789012:certificate/abc")
//!     .with_router_function(function.arn.as_str())
//!     .with_hosted_zone("Z123");
//!
//! let assembly = assemble(&request)?;
//! assert_eq!(assembly.dns_records.len(), 1);
//! ```

mod assemble;
mod config;
mod dns;
mod error;
mod refs;

pub use assemble::*;
pub use config::*;
pub use dns::*;
pub use error::*;
pub use refs::*;

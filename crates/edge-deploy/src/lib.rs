//! Desired-state composition for single-page app deployments.
//!
//! This crate provides:
//! - `Composer` - Runs the deployment stages in order and builds the graph
//! - `DesiredStateGraph` - Ordered, acyclic resource graph grouped by stage
//! - `ApplyEngine` / `apply_graph` - Stage-by-stage apply through a pluggable engine
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edge_core::{SeededIdentity, SpaConfig};
//! use edge_deploy::{apply_graph, Composer};
//!
//! let config = SpaConfig::new("shop", "dist")
//!     .with_alias("shop.example.com")
//!     .with_hosted_zone("Z123")
//!     .with_certificate("arn:aws:acm:us-east-1:123456789012:certificate/abc");
//!
//! let composition = Composer::new(config, Arc::new(SeededIdentity::new(seed))).compose()?;
//! let report = apply_graph(&engine, &composition.graph).await;
//! report.into_result()?;
//! ```

mod apply;
mod composer;
mod error;
mod graph;

pub use apply::*;
pub use composer::*;
pub use error::*;
pub use graph::*;

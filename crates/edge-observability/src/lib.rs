//! Observability for edge single-page app deployments.
//!
//! This crate provides:
//! - `init` - Installs the tracing subscriber in JSON or human format
//! - `StageLogger` - Logs and times composition stage transitions

mod logging;
mod stage;

pub use logging::*;
pub use stage::*;

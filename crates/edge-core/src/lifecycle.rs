//! Deployment stage lifecycle.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Stages of a single-page app composition, in their only valid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    /// Nothing composed yet.
    NotStarted,
    /// The rewrite function identity exists.
    RouterRegistered,
    /// The origin exists and every object upload is described.
    StoreReady,
    /// The distribution is assembled and its identity is final.
    DistributionReady,
    /// The access policy is bound to the final distribution identity.
    AccessBound,
    /// Terminal.
    Complete,
}

impl DeployStage {
    /// All stages in order.
    pub const ALL: [DeployStage; 6] = [
        DeployStage::NotStarted,
        DeployStage::RouterRegistered,
        DeployStage::StoreReady,
        DeployStage::DistributionReady,
        DeployStage::AccessBound,
        DeployStage::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStage::NotStarted => "not_started",
            DeployStage::RouterRegistered => "router_registered",
            DeployStage::StoreReady => "store_ready",
            DeployStage::DistributionReady => "distribution_ready",
            DeployStage::AccessBound => "access_bound",
            DeployStage::Complete => "complete",
        }
    }

    /// Get the stage number (0 for `NotStarted`).
    pub fn number(&self) -> u8 {
        match self {
            DeployStage::NotStarted => 0,
            DeployStage::RouterRegistered => 1,
            DeployStage::StoreReady => 2,
            DeployStage::DistributionReady => 3,
            DeployStage::AccessBound => 4,
            DeployStage::Complete => 5,
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(&self) -> Option<DeployStage> {
        match self {
            DeployStage::NotStarted => Some(DeployStage::RouterRegistered),
            DeployStage::RouterRegistered => Some(DeployStage::StoreReady),
            DeployStage::StoreReady => Some(DeployStage::DistributionReady),
            DeployStage::DistributionReady => Some(DeployStage::AccessBound),
            DeployStage::AccessBound => Some(DeployStage::Complete),
            DeployStage::Complete => None,
        }
    }

    /// Check that `to` directly follows this stage.
    pub fn transition(&self, to: DeployStage) -> CoreResult<DeployStage> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(CoreError::StageOrder {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployStage::Complete)
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer trait for stage transitions.
pub trait StageObserver: Send + Sync {
    /// Called after a stage is entered, with the time since composition started.
    fn on_stage(&self, stage: DeployStage, elapsed: Duration);

    /// Called when a stage fails and the remaining stages are abandoned.
    fn on_failure(&self, stage: DeployStage, error: &str) {
        let _ = (stage, error);
    }
}

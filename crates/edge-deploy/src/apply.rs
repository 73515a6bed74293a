//! Applying a desired-state graph through a pluggable engine.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use edge_core::{DeployStage, ResourceAddress};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ApplyError, DeployResult};
use crate::graph::{DesiredStateGraph, GraphNode};

/// A resource after the engine brought it into existence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedResource {
    pub address: ResourceAddress,
    /// Attributes learned while applying, such as `arn` or `id`.
    pub attributes: BTreeMap<String, String>,
}

impl AppliedResource {
    pub fn new(address: ResourceAddress) -> Self {
        Self {
            address,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Something that can bring one graph node into existence.
#[async_trait]
pub trait ApplyEngine: Send + Sync {
    /// Apply a single node. Dependencies have already been applied.
    async fn apply(&self, node: &GraphNode) -> Result<AppliedResource, ApplyError>;
}

/// Result of applying one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutcome {
    pub address: ResourceAddress,
    pub stage: DeployStage,
    pub result: Result<AppliedResource, ApplyError>,
}

/// Outcomes of an apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// One outcome per attempted node, in completion order of their rounds.
    pub outcomes: Vec<NodeOutcome>,
    /// Stage during which the run stopped, if it did not finish.
    pub halted_at: Option<DeployStage>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.halted_at.is_none()
    }

    pub fn applied(&self) -> impl Iterator<Item = &AppliedResource> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ApplyError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Every applied resource, or the first failure unmodified.
    pub fn into_result(self) -> DeployResult<Vec<AppliedResource>> {
        let mut applied = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            applied.push(outcome.result?);
        }
        Ok(applied)
    }
}

/// Apply a graph stage by stage.
///
/// Within a stage, nodes whose dependencies are applied run concurrently in
/// rounds. If any node of a round fails, the run stops: no further round or
/// stage is attempted, nothing is retried and nothing already applied is
/// rolled back.
pub async fn apply_graph<E>(engine: &E, graph: &DesiredStateGraph) -> ApplyReport
where
    E: ApplyEngine + ?Sized,
{
    let mut report = ApplyReport::default();
    let mut done: HashSet<&ResourceAddress> = HashSet::new();

    for stage in DeployStage::ALL {
        let mut pending: Vec<&GraphNode> = graph.stage_nodes(stage).collect();
        if pending.is_empty() {
            continue;
        }
        debug!(stage = %stage, nodes = pending.len(), "applying stage");

        while !pending.is_empty() {
            let (ready, waiting): (Vec<&GraphNode>, Vec<&GraphNode>) = pending
                .into_iter()
                .partition(|n| n.depends_on.iter().all(|d| done.contains(d)));

            if ready.is_empty() {
                warn!(stage = %stage, waiting = waiting.len(), "unresolvable dependencies");
                report.halted_at = Some(stage);
                return report;
            }

            let results = join_all(ready.iter().map(|node| engine.apply(node))).await;

            let mut failed = false;
            for (node, result) in ready.into_iter().zip(results) {
                match &result {
                    Ok(_) => {
                        done.insert(&node.address);
                    }
                    Err(e) => {
                        warn!(address = %node.address, error = %e, "apply failed");
                        failed = true;
                    }
                }
                report.outcomes.push(NodeOutcome {
                    address: node.address.clone(),
                    stage,
                    result,
                });
            }

            if failed {
                report.halted_at = Some(stage);
                return report;
            }
            pending = waiting;
        }

        info!(stage = %stage, applied = done.len(), "stage applied");
    }

    report
}

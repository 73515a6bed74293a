//! The desired-state graph.

use std::collections::BTreeSet;

use edge_content::ObjectUpload;
use edge_core::{DeployStage, Expr, ResourceAddress, ResourceKind};
use edge_distribution::{DistributionConfig, DnsRecord, ViewerCertificate};
use edge_router::EdgeFunction;
use edge_security::{BucketPolicy, OriginAccessControl};
use serde::Serialize;

use crate::error::{DeployError, DeployResult};

/// A resource the apply engine should bring into existence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    EdgeFunction(EdgeFunction),
    Bucket {
        bucket: String,
    },
    Object {
        bucket: Expr,
        #[serde(flatten)]
        upload: ObjectUpload,
    },
    OriginAccessControl(OriginAccessControl),
    Distribution(DistributionConfig),
    BucketPolicy(BucketPolicy),
    DnsRecord(DnsRecord),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::EdgeFunction(_) => ResourceKind::EdgeFunction,
            Resource::Bucket { .. } => ResourceKind::Bucket,
            Resource::Object { .. } => ResourceKind::Object,
            Resource::OriginAccessControl(_) => ResourceKind::OriginAccessControl,
            Resource::Distribution(_) => ResourceKind::Distribution,
            Resource::BucketPolicy(_) => ResourceKind::BucketPolicy,
            Resource::DnsRecord(_) => ResourceKind::DnsRecord,
        }
    }

    /// Every reference-valued field of the resource.
    ///
    /// Plain strings such as object keys, aliases or function code are never
    /// included, even when they happen to look like `${...}`.
    pub fn references(&self) -> Vec<&Expr> {
        match self {
            Resource::EdgeFunction(_)
            | Resource::Bucket { .. }
            | Resource::OriginAccessControl(_) => Vec::new(),
            Resource::Object { bucket, .. } => vec![bucket],
            Resource::Distribution(config) => {
                let mut refs: Vec<&Expr> = config
                    .origins
                    .iter()
                    .filter_map(|o| o.origin_access_control_id.as_ref())
                    .collect();
                refs.extend(
                    config
                        .default_cache_behavior
                        .function_associations
                        .iter()
                        .map(|a| &a.function_arn),
                );
                if let ViewerCertificate::Acm {
                    acm_certificate_arn,
                    ..
                } = &config.viewer_certificate
                {
                    refs.push(acm_certificate_arn);
                }
                refs
            }
            Resource::BucketPolicy(policy) => policy
                .policy
                .statement
                .iter()
                .map(|s| &s.condition.value)
                .collect(),
            Resource::DnsRecord(record) => vec![&record.alias.name, &record.alias.zone_id],
        }
    }
}

/// One resource in the graph, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub address: ResourceAddress,
    pub stage: DeployStage,
    /// Graph resources this one references, all inserted before it.
    pub depends_on: Vec<ResourceAddress>,
    pub resource: Resource,
}

/// Ordered desired-state graph.
///
/// Nodes are kept in insertion order, which is also stage order. Every
/// reference a node holds to another graph resource must point at a node
/// inserted earlier, so the graph is acyclic by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DesiredStateGraph {
    nodes: Vec<GraphNode>,
}

impl DesiredStateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource produced by `stage`.
    ///
    /// Fails with [`DeployError::IdentityCollision`] when the address is
    /// taken, [`DeployError::ForwardReference`] when the resource references
    /// a graph resource not inserted yet, and a stage-order error when
    /// `stage` precedes the last inserted node's stage.
    pub fn insert(
        &mut self,
        stage: DeployStage,
        name: impl Into<String>,
        resource: Resource,
    ) -> DeployResult<&GraphNode> {
        let address = ResourceAddress::new(resource.kind(), name);

        if self.contains(&address) {
            return Err(DeployError::IdentityCollision(address.to_string()));
        }

        if let Some(last) = self.nodes.last() {
            if stage < last.stage {
                return Err(edge_core::CoreError::StageOrder {
                    from: last.stage.to_string(),
                    to: stage.to_string(),
                }
                .into());
            }
        }

        let depends_on: BTreeSet<ResourceAddress> = resource
            .references()
            .into_iter()
            .filter_map(Expr::target)
            .collect();
        for target in &depends_on {
            if !self.contains(target) {
                return Err(DeployError::ForwardReference {
                    node: address.to_string(),
                    target: target.to_string(),
                });
            }
        }

        self.nodes.push(GraphNode {
            address,
            stage,
            depends_on: depends_on.into_iter().collect(),
            resource,
        });
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    pub fn contains(&self, address: &ResourceAddress) -> bool {
        self.nodes.iter().any(|n| &n.address == address)
    }

    pub fn get(&self, address: &ResourceAddress) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.address == address)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Nodes produced by one stage, in insertion order.
    pub fn stage_nodes(&self, stage: DeployStage) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.stage == stage)
    }

    /// Nodes of one kind, in insertion order.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.address.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bucket(name: &str) -> Resource {
        Resource::Bucket {
            bucket: name.to_string(),
        }
    }

    fn object(bucket: &str, key: &str) -> Resource {
        Resource::Object {
            bucket: ResourceAddress::new(ResourceKind::Bucket, bucket).attr("id"),
            upload: ObjectUpload {
                key: key.to_string(),
                source: PathBuf::from(key),
                content_type: "text/html".to_string(),
                cache_control: "no-store".to_string(),
            },
        }
    }

    #[test]
    fn test_insert_records_dependencies() {
        let mut graph = DesiredStateGraph::new();
        graph.insert(DeployStage::StoreReady, "spa-01", bucket("spa-01")).unwrap();
        let node = graph
            .insert(DeployStage::StoreReady, "index.html", object("spa-01", "index.html"))
            .unwrap();

        assert_eq!(
            node.depends_on,
            vec![ResourceAddress::new(ResourceKind::Bucket, "spa-01")]
        );
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.of_kind(ResourceKind::Object).count(), 1);
    }

    #[test]
    fn test_reference_shaped_key_is_not_a_dependency() {
        let key = "${aws_cloudfront_distribution.site.arn}";
        let mut graph = DesiredStateGraph::new();
        graph.insert(DeployStage::StoreReady, "spa-01", bucket("spa-01")).unwrap();
        let node = graph
            .insert(DeployStage::StoreReady, key, object("spa-01", key))
            .unwrap();

        assert_eq!(
            node.depends_on,
            vec![ResourceAddress::new(ResourceKind::Bucket, "spa-01")]
        );
        assert_eq!(
            node.resource.references(),
            vec![&ResourceAddress::new(ResourceKind::Bucket, "spa-01").attr("id")]
        );
    }

    #[test]
    fn test_duplicate_address_collides() {
        let mut graph = DesiredStateGraph::new();
        graph.insert(DeployStage::StoreReady, "spa-01", bucket("spa-01")).unwrap();
        let err = graph
            .insert(DeployStage::StoreReady, "spa-01", bucket("spa-01"))
            .unwrap_err();
        assert!(matches!(err, DeployError::IdentityCollision(_)));
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut graph = DesiredStateGraph::new();
        let err = graph
            .insert(DeployStage::StoreReady, "index.html", object("spa-01", "index.html"))
            .unwrap_err();
        assert!(matches!(err, DeployError::ForwardReference { .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_stage_regression_rejected() {
        let mut graph = DesiredStateGraph::new();
        graph.insert(DeployStage::StoreReady, "spa-01", bucket("spa-01")).unwrap();
        let err = graph
            .insert(DeployStage::RouterRegistered, "spa-02", bucket("spa-02"))
            .unwrap_err();
        assert!(matches!(err, DeployError::Core(_)));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let mut graph = DesiredStateGraph::new();
        graph.insert(DeployStage::StoreReady, "spa-01", bucket("spa-01")).unwrap();
        graph
            .insert(DeployStage::StoreReady, "app.js", object("spa-01", "app.js"))
            .unwrap();

        let value = serde_json::to_value(&graph).unwrap();
        let object = &value["nodes"][1];
        assert_eq!(object["stage"], "store_ready");
        assert_eq!(object["resource"]["kind"], "object");
        assert_eq!(object["resource"]["key"], "app.js");
        assert_eq!(object["resource"]["bucket"], "${aws_s3_bucket.spa-01.id}");
    }
}

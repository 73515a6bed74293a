//! Least-privilege access binding between an origin and one distribution.

use std::collections::BTreeMap;

use edge_core::{DistributionIdentity, Expr, StorageOrigin};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Policy language version.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Service principal of the edge network.
pub const EDGE_SERVICE_PRINCIPAL: &str = "cloudfront.amazonaws.com";

/// The only capability granted: reading objects.
pub const READ_OBJECT_ACTION: &str = "s3:GetObject";

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Principal a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Service principal identifier.
    #[serde(rename = "Service")]
    pub service: String,
}

/// Condition narrowing a statement to requests with a matching context value.
///
/// Serializes as `{"<test>": {"<variable>": "<value>"}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Comparison operator, e.g. `StringEquals`.
    pub test: String,
    /// Request context key, e.g. `AWS:SourceArn`.
    pub variable: String,
    /// Expected value.
    pub value: Expr,
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut inner = BTreeMap::new();
        inner.insert(self.variable.as_str(), self.value.as_str());

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.test, &inner)?;
        map.end()
    }
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessPolicy {
    /// Allow or deny.
    pub effect: Effect,
    /// Who the statement applies to.
    pub principal: Principal,
    /// Granted actions.
    #[serde(rename = "Action")]
    pub actions: Vec<String>,
    /// Resources the actions apply to.
    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
    /// Restriction on the requesting source.
    pub condition: Condition,
}

impl AccessPolicy {
    /// The distribution ARN this policy is scoped to.
    pub fn source_arn(&self) -> &Expr {
        &self.condition.value
    }

    /// Wrap the statement in a policy document.
    pub fn document(&self) -> PolicyDocument {
        PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![self.clone()],
        }
    }
}

/// A policy document: a version and a statement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<AccessPolicy>,
}

impl PolicyDocument {
    /// Render the document as compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Render the document as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Derives the access policy that lets exactly one distribution read
/// exactly one origin.
///
/// Without the source condition any distribution in the account could read
/// the origin's contents, so the distribution identity is a required input:
/// it must be final before derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessBinding;

impl AccessBinding {
    /// Derive the policy for an origin and the distribution fronting it.
    pub fn derive(origin: &StorageOrigin, distribution: &DistributionIdentity) -> AccessPolicy {
        AccessPolicy {
            effect: Effect::Allow,
            principal: Principal {
                service: EDGE_SERVICE_PRINCIPAL.to_string(),
            },
            actions: vec![READ_OBJECT_ACTION.to_string()],
            resources: vec![origin.arn(), origin.objects_arn()],
            condition: Condition {
                test: "StringEquals".to_string(),
                variable: "AWS:SourceArn".to_string(),
                value: distribution.arn.clone(),
            },
        }
    }
}

/// The policy attached to the origin bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketPolicy {
    /// Bucket the policy is attached to.
    pub bucket: String,
    /// Policy document.
    pub policy: PolicyDocument,
}

impl BucketPolicy {
    /// Attach a derived policy to its origin.
    pub fn new(origin: &StorageOrigin, policy: &AccessPolicy) -> Self {
        Self {
            bucket: origin.id.clone(),
            policy: policy.document(),
        }
    }
}

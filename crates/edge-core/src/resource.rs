//! Resource addresses, attribute references and the identities passed
//! between deployment stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of resource in the desired-state graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Edge function evaluated on viewer requests.
    EdgeFunction,
    /// Storage bucket acting as the origin.
    Bucket,
    /// A single object uploaded to the bucket.
    Object,
    /// Signing identity the distribution uses towards the origin.
    OriginAccessControl,
    /// Edge distribution.
    Distribution,
    /// Access policy attached to the bucket.
    BucketPolicy,
    /// DNS alias record.
    DnsRecord,
}

impl ResourceKind {
    /// Every kind the desired-state graph can hold.
    pub const ALL: [ResourceKind; 7] = [
        Self::EdgeFunction,
        Self::Bucket,
        Self::Object,
        Self::OriginAccessControl,
        Self::Distribution,
        Self::BucketPolicy,
        Self::DnsRecord,
    ];

    /// Look up a kind by its provider type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Provider type name used in addresses and references.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EdgeFunction => "aws_cloudfront_function",
            Self::Bucket => "aws_s3_bucket",
            Self::Object => "aws_s3_object",
            Self::OriginAccessControl => "aws_cloudfront_origin_access_control",
            Self::Distribution => "aws_cloudfront_distribution",
            Self::BucketPolicy => "aws_s3_bucket_policy",
            Self::DnsRecord => "aws_route53_record",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one resource in the graph (`<kind>.<name>`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceAddress {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Name, unique within the kind.
    pub name: String,
}

impl ResourceAddress {
    /// Create a new address.
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Reference to an attribute of this resource.
    pub fn attr(&self, attribute: &str) -> Expr {
        Expr::attribute(self, attribute)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.name)
    }
}

/// A value in the desired state: either a literal or a reference to an
/// attribute the apply engine learns when it creates the resource.
///
/// References render as `${<kind>.<name>.<attribute>}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expr(String);

impl Expr {
    /// A literal value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A reference to an attribute of another resource.
    pub fn attribute(address: &ResourceAddress, attribute: &str) -> Self {
        Self(format!("${{{}.{}}}", address, attribute))
    }

    /// Whether this value is resolved by the apply engine.
    pub fn is_reference(&self) -> bool {
        self.0.starts_with("${") && self.0.ends_with('}')
    }

    /// The rendered value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The graph resource a reference points at.
    ///
    /// Returns `None` for literals and for references to kinds the graph
    /// does not manage, such as an externally created certificate.
    pub fn target(&self) -> Option<ResourceAddress> {
        if !self.is_reference() {
            return None;
        }
        let inner = &self.0[2..self.0.len() - 1];
        let (kind, rest) = inner.split_once('.')?;
        let (name, _attribute) = rest.rsplit_once('.')?;
        let kind = ResourceKind::from_type_name(kind)?;
        Some(ResourceAddress::new(kind, name))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The storage location the edge network fetches content from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageOrigin {
    /// Bucket name.
    pub id: String,
    /// Regional domain of the bucket.
    pub domain: String,
}

impl StorageOrigin {
    /// Origin for a bucket in a region.
    pub fn new(id: impl Into<String>, region: &str) -> Self {
        let id = id.into();
        let domain = format!("{}.s3.{}.amazonaws.com", id, region);
        Self { id, domain }
    }

    /// ARN of the bucket itself.
    pub fn arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.id)
    }

    /// ARN pattern covering every object in the bucket.
    pub fn objects_arn(&self) -> String {
        format!("arn:aws:s3:::{}/*", self.id)
    }
}

/// Identity of an assembled distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionIdentity {
    /// Distribution ARN.
    pub arn: Expr,
    /// Domain name the edge network serves the distribution on.
    pub domain_name: Expr,
    /// Hosted zone of the edge network's domain, used as alias target zone.
    pub hosted_zone_id: Expr,
}

impl DistributionIdentity {
    /// Identity referring to the attributes of a distribution resource.
    pub fn for_address(address: &ResourceAddress) -> Self {
        Self {
            arn: address.attr("arn"),
            domain_name: address.attr("domain_name"),
            hosted_zone_id: address.attr("hosted_zone_id"),
        }
    }
}

/// Identity of a registered edge function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionIdentity {
    /// Function name.
    pub name: String,
    /// Function ARN.
    pub arn: Expr,
}

impl FunctionIdentity {
    /// Identity referring to the attributes of a function resource.
    pub fn for_address(address: &ResourceAddress) -> Self {
        Self {
            name: address.name.clone(),
            arn: address.attr("arn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = ResourceAddress::new(ResourceKind::Distribution, "site");
        assert_eq!(addr.to_string(), "aws_cloudfront_distribution.site");
    }

    #[test]
    fn test_attribute_reference() {
        let addr = ResourceAddress::new(ResourceKind::Distribution, "site");
        let arn = addr.attr("arn");
        assert_eq!(arn.as_str(), "${aws_cloudfront_distribution.site.arn}");
        assert!(arn.is_reference());
        assert!(!Expr::literal("Z2FDTNDATAQYW2").is_reference());
    }

    #[test]
    fn test_reference_target() {
        let addr = ResourceAddress::new(ResourceKind::Distribution, "site");
        assert_eq!(addr.attr("domain_name").target(), Some(addr));

        let record = ResourceAddress::new(ResourceKind::DnsRecord, "www.example.com");
        assert_eq!(record.attr("fqdn").target(), Some(record));

        assert_eq!(Expr::literal("${aws_acm_certificate.site.arn}").target(), None);
        assert_eq!(Expr::literal("arn:aws:s3:::bucket").target(), None);
        assert_eq!(Expr::literal("${aws_s3_bucket}").target(), None);
    }

    #[test]
    fn test_kind_type_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_type_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::from_type_name("aws_lambda_function"), None);
    }

    #[test]
    fn test_origin_arns() {
        let origin = StorageOrigin::new("my-spa-0a1b2c", "us-east-1");
        assert_eq!(origin.domain, "my-spa-0a1b2c.s3.us-east-1.amazonaws.com");
        assert_eq!(origin.arn(), "arn:aws:s3:::my-spa-0a1b2c");
        assert_eq!(origin.objects_arn(), "arn:aws:s3:::my-spa-0a1b2c/*");
    }

    #[test]
    fn test_expr_serializes_as_string() {
        let json = serde_json::to_string(&Expr::literal("x")).unwrap();
        assert_eq!(json, "\"x\"");
    }
}

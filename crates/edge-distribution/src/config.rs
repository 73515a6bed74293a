//! Distribution configuration blocks.

use edge_cache::CacheBehavior;
use edge_core::Expr;
use serde::Serialize;

use crate::refs::CertificateRef;

/// Identifier of the single origin inside the distribution.
pub const ORIGIN_ID: &str = "s3Origin";

/// Object served for requests to the root.
pub const DEFAULT_ROOT_OBJECT: &str = "index.html";

/// Countries the distribution is served to.
pub const ALLOWED_LOCATIONS: &[&str] = &["US"];

/// Complete configuration of one distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionConfig {
    /// Whether the distribution accepts requests.
    pub enabled: bool,
    /// Whether IPv6 is enabled.
    pub ipv6_enabled: bool,
    /// Description.
    pub comment: String,
    /// Custom domains served.
    pub aliases: Vec<String>,
    /// Origins content is fetched from.
    pub origins: Vec<Origin>,
    /// Object returned for `/`.
    pub default_root_object: String,
    /// Behavior for every path.
    pub default_cache_behavior: DefaultCacheBehavior,
    /// Geographic restrictions.
    pub restrictions: GeoRestriction,
    /// TLS certificate presented to viewers.
    pub viewer_certificate: ViewerCertificate,
}

/// An origin of the distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    /// Identifier referenced by cache behaviors.
    pub origin_id: String,
    /// Domain of the origin.
    pub domain_name: String,
    /// Access control used to sign origin requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_access_control_id: Option<Expr>,
}

/// The default cache behavior: the fixed cache settings plus routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultCacheBehavior {
    /// Origin requests are routed to.
    pub target_origin_id: String,
    /// Fixed cache settings.
    #[serde(flatten)]
    pub cache: CacheBehavior,
    /// Functions run on lifecycle events.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub function_associations: Vec<FunctionAssociation>,
}

/// Lifecycle event a function runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ViewerRequest,
    ViewerResponse,
}

/// A function bound to a lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionAssociation {
    pub event_type: EventType,
    pub function_arn: Expr,
}

/// Kind of geographic restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionType {
    /// Only listed locations are served.
    Whitelist,
    /// Listed locations are refused.
    Blacklist,
    /// No restriction.
    None,
}

/// Geographic restriction block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoRestriction {
    pub restriction_type: RestrictionType,
    pub locations: Vec<String>,
}

impl Default for GeoRestriction {
    fn default() -> Self {
        Self {
            restriction_type: RestrictionType::Whitelist,
            locations: ALLOWED_LOCATIONS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Certificate presented to viewers. A custom certificate is always served
/// with SNI; without one the platform's shared certificate is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerCertificate {
    /// Custom certificate served via SNI.
    Acm {
        acm_certificate_arn: Expr,
        ssl_support_method: String,
    },
    /// Platform default certificate.
    Default { cloudfront_default_certificate: bool },
}

impl ViewerCertificate {
    /// Certificate block for an optional custom certificate.
    pub fn for_certificate(certificate: Option<&CertificateRef>) -> Self {
        match certificate {
            Some(cert) => Self::Acm {
                acm_certificate_arn: cert.as_expr().clone(),
                ssl_support_method: "sni-only".to_string(),
            },
            None => Self::Default {
                cloudfront_default_certificate: true,
            },
        }
    }

    /// Check if viewers are served a custom certificate over SNI.
    pub fn is_sni_only(&self) -> bool {
        matches!(self, Self::Acm { ssl_support_method, .. } if ssl_support_method == "sni-only")
    }

    /// Check if the platform default certificate is used.
    pub fn uses_default_certificate(&self) -> bool {
        matches!(self, Self::Default { .. })
    }
}

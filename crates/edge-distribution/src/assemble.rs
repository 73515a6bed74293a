//! Distribution assembly.

use std::collections::BTreeSet;

use edge_cache::CacheBehavior;
use edge_core::{DistributionIdentity, Expr, ResourceAddress, ResourceKind, StorageOrigin};
use tracing::{debug, warn};

use crate::config::{
    DefaultCacheBehavior, DistributionConfig, EventType, FunctionAssociation, GeoRestriction,
    Origin, ViewerCertificate, DEFAULT_ROOT_OBJECT, ORIGIN_ID,
};
use crate::dns::{alias_records, DnsRecord, MissingRoutingPrerequisite};
use crate::error::DistributionResult;
use crate::refs::{CertificateRef, FunctionRef};

/// Inputs of one distribution assembly.
#[derive(Debug, Clone)]
pub struct DistributionRequest {
    /// Name of the distribution in the graph.
    pub name: String,
    /// Origin the distribution fronts.
    pub origin: StorageOrigin,
    /// Access control signing origin requests.
    pub origin_access_control_id: Option<Expr>,
    /// Custom domains.
    pub aliases: Vec<String>,
    /// TLS certificate, if any.
    pub certificate_ref: Option<String>,
    /// Viewer-request function, if any.
    pub router_function_ref: Option<String>,
    /// Hosted zone for DNS records, if any.
    pub hosted_zone_id: Option<String>,
}

impl DistributionRequest {
    /// Create a request for a distribution fronting an origin.
    pub fn new(name: impl Into<String>, origin: StorageOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
            origin_access_control_id: None,
            aliases: Vec::new(),
            certificate_ref: None,
            router_function_ref: None,
            hosted_zone_id: None,
        }
    }

    /// Sign origin requests with an access control.
    pub fn with_origin_access_control(mut self, id: Expr) -> Self {
        self.origin_access_control_id = Some(id);
        self
    }

    /// Serve custom domains.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Serve viewers a custom certificate.
    pub fn with_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate_ref = Some(certificate.into());
        self
    }

    /// Run a function on viewer requests.
    pub fn with_router_function(mut self, function: impl Into<String>) -> Self {
        self.router_function_ref = Some(function.into());
        self
    }

    /// Create DNS records in a hosted zone.
    pub fn with_hosted_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.hosted_zone_id = Some(zone_id.into());
        self
    }
}

/// Result of a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Address of the distribution in the graph.
    pub address: ResourceAddress,
    /// Distribution configuration.
    pub config: DistributionConfig,
    /// Identity of the assembled distribution.
    pub identity: DistributionIdentity,
    /// Alias records, sorted by name.
    pub dns_records: Vec<DnsRecord>,
    /// Why no DNS records were produced, when only one prerequisite was given.
    pub missing_routing: Option<MissingRoutingPrerequisite>,
}

/// Assemble a distribution.
///
/// Malformed certificate or function references abort the assembly; no
/// partial distribution is returned. Missing DNS prerequisites are not
/// errors: they yield zero records.
pub fn assemble(request: &DistributionRequest) -> DistributionResult<Assembly> {
    let certificate = request
        .certificate_ref
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(CertificateRef::parse)
        .transpose()?;

    let function = request
        .router_function_ref
        .as_deref()
        .map(FunctionRef::parse)
        .transpose()?;

    let aliases: Vec<String> = request
        .aliases
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    if certificate.is_none() && !aliases.is_empty() {
        warn!(
            distribution = %request.name,
            "aliases configured without a certificate, viewers will see the default certificate"
        );
    }

    let function_associations = function
        .iter()
        .map(|f| FunctionAssociation {
            event_type: EventType::ViewerRequest,
            function_arn: f.as_expr().clone(),
        })
        .collect();

    let config = DistributionConfig {
        enabled: true,
        ipv6_enabled: true,
        comment: format!("Distribution for the {} bucket", request.origin.id),
        aliases: aliases.clone(),
        origins: vec![Origin {
            origin_id: ORIGIN_ID.to_string(),
            domain_name: request.origin.domain.clone(),
            origin_access_control_id: request.origin_access_control_id.clone(),
        }],
        default_root_object: DEFAULT_ROOT_OBJECT.to_string(),
        default_cache_behavior: DefaultCacheBehavior {
            target_origin_id: ORIGIN_ID.to_string(),
            cache: CacheBehavior::default(),
            function_associations,
        },
        restrictions: GeoRestriction::default(),
        viewer_certificate: ViewerCertificate::for_certificate(certificate.as_ref()),
    };

    let address = ResourceAddress::new(ResourceKind::Distribution, &request.name);
    let identity = DistributionIdentity::for_address(&address);
    let (dns_records, missing_routing) =
        alias_records(request.hosted_zone_id.as_deref(), &aliases, &identity);

    debug!(
        distribution = %address,
        aliases = aliases.len(),
        dns_records = dns_records.len(),
        sni = config.viewer_certificate.is_sni_only(),
        "assembled distribution"
    );

    Ok(Assembly {
        address,
        config,
        identity,
        dns_records,
        missing_routing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DistributionError;

    const CERT: &str = "arn:aws:acm:us-east-1:123456789012:certificate/abc-123";
    const FUNCTION: &str = "${aws_cloudfront_function.rewrite-function-AbCdEfGh.arn}";

    fn origin() -> StorageOrigin {
        StorageOrigin::new("shop-0a1b2c3d4e5f", "us-east-1")
    }

    #[test]
    fn test_full_assembly() {
        let request = DistributionRequest::new("site", origin())
            .with_origin_access_control(Expr::literal("${oac.id}"))
            .with_aliases(["www.example.com", "example.com"])
            .with_certificate(CERT)
            .with_router_function(FUNCTION)
            .with_hosted_zone("Z123");

        let assembly = assemble(&request).unwrap();
        let config = &assembly.config;

        assert!(config.enabled);
        assert_eq!(config.aliases, vec!["example.com", "www.example.com"]);
        assert_eq!(config.default_root_object, "index.html");
        assert_eq!(config.origins[0].domain_name, "shop-0a1b2c3d4e5f.s3.us-east-1.amazonaws.com");
        assert!(config.viewer_certificate.is_sni_only());

        let associations = &config.default_cache_behavior.function_associations;
        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].event_type, EventType::ViewerRequest);
        assert_eq!(associations[0].function_arn.as_str(), FUNCTION);

        assert_eq!(assembly.dns_records.len(), 2);
        assert_eq!(
            assembly.identity.arn.as_str(),
            "${aws_cloudfront_distribution.site.arn}"
        );
    }

    #[test]
    fn test_minimal_assembly() {
        let assembly = assemble(&DistributionRequest::new("site", origin())).unwrap();
        assert!(assembly.config.viewer_certificate.uses_default_certificate());
        assert!(assembly
            .config
            .default_cache_behavior
            .function_associations
            .is_empty());
        assert!(assembly.config.aliases.is_empty());
        assert!(assembly.dns_records.is_empty());
        assert!(assembly.missing_routing.is_none());
    }

    #[test]
    fn test_fixed_structural_defaults() {
        let assembly = assemble(&DistributionRequest::new("site", origin())).unwrap();
        let behavior = &assembly.config.default_cache_behavior;
        assert_eq!(behavior.cache, CacheBehavior::default());
        assert_eq!(behavior.target_origin_id, ORIGIN_ID);
        assert_eq!(assembly.config.restrictions, GeoRestriction::default());
    }

    #[test]
    fn test_aliases_without_zone() {
        let request = DistributionRequest::new("site", origin())
            .with_aliases(["example.com"])
            .with_certificate(CERT);
        let assembly = assemble(&request).unwrap();
        assert!(assembly.dns_records.is_empty());
        assert_eq!(
            assembly.missing_routing,
            Some(MissingRoutingPrerequisite::NoHostedZone { aliases: 1 })
        );
    }

    #[test]
    fn test_malformed_references_abort() {
        let bad_cert = DistributionRequest::new("site", origin()).with_certificate("bogus");
        assert!(matches!(
            assemble(&bad_cert),
            Err(DistributionError::MalformedCertificate(_))
        ));

        let bad_function =
            DistributionRequest::new("site", origin()).with_router_function("rewrite");
        assert!(matches!(
            assemble(&bad_function),
            Err(DistributionError::MalformedFunction(_))
        ));
    }

    #[test]
    fn test_empty_certificate_is_absent() {
        let request = DistributionRequest::new("site", origin()).with_certificate("");
        let assembly = assemble(&request).unwrap();
        assert!(assembly.config.viewer_certificate.uses_default_certificate());
    }
}

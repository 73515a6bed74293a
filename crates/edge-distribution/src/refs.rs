//! Validated references to externally managed resources.

use std::fmt;

use edge_core::Expr;

use crate::error::{DistributionError, DistributionResult};

/// A TLS certificate the distribution serves viewers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRef(Expr);

impl CertificateRef {
    /// Parse a certificate ARN
    /// (`arn:<partition>:acm:<region>:<account>:certificate/<id>`) or an
    /// attribute reference.
    pub fn parse(value: &str) -> DistributionResult<Self> {
        let value = value.trim();
        if is_reference(value) || is_arn(value, "acm", true, "certificate/") {
            Ok(Self(Expr::literal(value)))
        } else {
            Err(DistributionError::MalformedCertificate(value.to_string()))
        }
    }

    pub fn as_expr(&self) -> &Expr {
        &self.0
    }
}

impl fmt::Display for CertificateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An edge function associated with the distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef(Expr);

impl FunctionRef {
    /// Parse a function ARN
    /// (`arn:<partition>:cloudfront::<account>:function/<name>`) or an
    /// attribute reference.
    pub fn parse(value: &str) -> DistributionResult<Self> {
        let value = value.trim();
        if is_reference(value) || is_arn(value, "cloudfront", false, "function/") {
            Ok(Self(Expr::literal(value)))
        } else {
            Err(DistributionError::MalformedFunction(value.to_string()))
        }
    }

    pub fn as_expr(&self) -> &Expr {
        &self.0
    }
}

fn is_reference(value: &str) -> bool {
    value.len() > 3 && Expr::literal(value).is_reference()
}

fn is_arn(value: &str, service: &str, regional: bool, resource_prefix: &str) -> bool {
    let parts: Vec<&str> = value.splitn(6, ':').collect();
    if parts.len() != 6 {
        return false;
    }
    let [arn, partition, svc, region, account, resource] =
        [parts[0], parts[1], parts[2], parts[3], parts[4], parts[5]];

    arn == "arn"
        && partition.starts_with("aws")
        && svc == service
        && (region.is_empty() != regional)
        && account.len() == 12
        && account.chars().all(|c| c.is_ascii_digit())
        && resource
            .strip_prefix(resource_prefix)
            .map(|id| !id.is_empty() && !id.contains(char::is_whitespace))
            .unwrap_or(false)
}

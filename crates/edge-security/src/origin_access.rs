//! Origin access control: the identity the distribution signs origin
//! requests with.

use serde::Serialize;

/// Signing configuration the distribution uses when fetching from the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginAccessControl {
    /// Name, unique within the account.
    pub name: String,
    /// Description.
    pub description: String,
    /// Origin type.
    pub origin_type: String,
    /// When requests are signed.
    pub signing_behavior: String,
    /// Signing protocol.
    pub signing_protocol: String,
}

impl OriginAccessControl {
    /// Always-signed SigV4 access control for a bucket origin.
    pub fn for_bucket(name: impl Into<String>, bucket: &str) -> Self {
        Self {
            name: name.into(),
            description: format!("Edge read access to {}", bucket),
            origin_type: "s3".to_string(),
            signing_behavior: "always".to_string(),
            signing_protocol: "sigv4".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_bucket() {
        let oac = OriginAccessControl::for_bucket("access-control-AbCd", "shop-01");
        assert_eq!(oac.origin_type, "s3");
        assert_eq!(oac.signing_behavior, "always");
        assert_eq!(oac.signing_protocol, "sigv4");
    }
}

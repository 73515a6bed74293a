//! Deployment configuration for a single-page app.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Inputs of one single-page app composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaConfig {
    /// Application name, used as the bucket name prefix.
    pub name: String,
    /// Local build directory to upload.
    pub local_path: PathBuf,
    /// Region of the origin bucket.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom domains served by the distribution.
    #[serde(default)]
    pub domain_aliases: Vec<String>,
    /// Hosted zone to create DNS alias records in.
    #[serde(default)]
    pub hosted_zone_id: Option<String>,
    /// Certificate the distribution uses for TLS.
    #[serde(default)]
    pub certificate_arn: Option<String>,
    /// Names already taken in the account.
    #[serde(default)]
    pub reserved_names: BTreeSet<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl SpaConfig {
    /// Create a configuration with no custom domains.
    pub fn new(name: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            local_path: local_path.into(),
            region: default_region(),
            domain_aliases: Vec::new(),
            hosted_zone_id: None,
            certificate_arn: None,
            reserved_names: BTreeSet::new(),
        }
    }

    /// Set the origin region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Add a custom domain alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.domain_aliases.push(alias.into());
        self
    }

    /// Set the hosted zone for DNS records.
    pub fn with_hosted_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.hosted_zone_id = Some(zone_id.into());
        self
    }

    /// Set the TLS certificate.
    pub fn with_certificate(mut self, arn: impl Into<String>) -> Self {
        self.certificate_arn = Some(arn.into());
        self
    }

    /// Mark a name as already taken.
    pub fn with_reserved_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.insert(name.into());
        self
    }

    /// Hosted zone id, treating an empty string as absent.
    pub fn hosted_zone(&self) -> Option<&str> {
        self.hosted_zone_id
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
    }

    /// Certificate ARN, treating an empty string as absent.
    pub fn certificate(&self) -> Option<&str> {
        self.certificate_arn
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Name prefix that is valid inside a bucket name: lowercase
    /// alphanumerics and single dashes, at most 40 characters.
    pub fn bucket_prefix(&self) -> String {
        let mut prefix = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                prefix.push(c.to_ascii_lowercase());
            } else if !prefix.is_empty() && !prefix.ends_with('-') {
                prefix.push('-');
            }
        }
        prefix.truncate(40);
        let prefix = prefix.trim_end_matches('-').to_string();
        if prefix.is_empty() {
            "spa".to_string()
        } else {
            prefix
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidConfig("app name is empty".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(CoreError::InvalidConfig("region is empty".to_string()));
        }
        if let Some(alias) = self.domain_aliases.iter().find(|a| a.trim().is_empty()) {
            return Err(CoreError::InvalidConfig(format!(
                "domain alias {:?} is empty",
                alias
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SpaConfig::new("shop", "dist")
            .with_alias("example.com")
            .with_hosted_zone("Z123")
            .with_certificate("arn:aws:acm:us-east-1:123456789012:certificate/abc");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.domain_aliases, vec!["example.com"]);
        assert_eq!(config.hosted_zone(), Some("Z123"));
        assert!(config.certificate().is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_zone_is_absent() {
        let config = SpaConfig::new("shop", "dist").with_hosted_zone("  ");
        assert_eq!(config.hosted_zone(), None);
    }

    #[test]
    fn test_bucket_prefix() {
        assert_eq!(SpaConfig::new("My Shop!", "dist").bucket_prefix(), "my-shop");
        assert_eq!(SpaConfig::new("__", "dist").bucket_prefix(), "spa");
        let long = "a".repeat(80);
        assert_eq!(SpaConfig::new(long, "dist").bucket_prefix().len(), 40);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert!(SpaConfig::new(" ", "dist").validate().is_err());
        assert!(SpaConfig::new("ok", "dist").with_alias("").validate().is_err());
    }
}

//! CLI configuration.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use edge_core::SpaConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Application settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Custom domain settings.
    #[serde(default)]
    pub domain: DomainConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Get environment-specific config.
    pub fn for_environment(&self, env: &str) -> Result<CliConfig> {
        let env_config = self
            .environments
            .get(env)
            .with_context(|| format!("Unknown environment: {}", env))?;

        let mut config = self.clone();
        if let Some(ref domain) = env_config.domain {
            config.domain = domain.clone();
        }
        if let Some(ref region) = env_config.region {
            config.app.region = region.clone();
        }
        Ok(config)
    }

    /// Deployment inputs, with the build directory resolved against `base`.
    pub fn to_spa_config(&self, base: &Path) -> SpaConfig {
        let mut spa = SpaConfig::new(&self.app.name, base.join(&self.app.build_dir))
            .with_region(&self.app.region);
        for alias in &self.domain.aliases {
            spa = spa.with_alias(alias);
        }
        if let Some(ref zone) = self.domain.hosted_zone_id {
            spa = spa.with_hosted_zone(zone);
        }
        if let Some(ref arn) = self.domain.certificate_arn {
            spa = spa.with_certificate(arn);
        }
        spa.reserved_names = self.domain.reserved_names.clone();
        spa
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name, used as the bucket name prefix.
    #[serde(default)]
    pub name: String,

    /// Identity seed. Every generated resource name derives from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,

    /// Build output directory, relative to the config file.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Region of the origin bucket.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_build_dir() -> String {
    "dist".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            seed: None,
            build_dir: default_build_dir(),
            region: default_region(),
        }
    }
}

/// Custom domain settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domains served by the distribution.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Hosted zone to create alias records in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_zone_id: Option<String>,

    /// Certificate for the aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_arn: Option<String>,

    /// Names already taken in the account.
    #[serde(default)]
    pub reserved_names: BTreeSet<String>,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Region override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Domain config override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainConfig>,
}

/// Generate a default edge.toml config file.
pub fn generate_default_config(name: &str, seed: &str, build_dir: &str) -> Result<String> {
    let mut config = CliConfig {
        app: AppConfig {
            name: name.to_string(),
            seed: Some(seed.to_string()),
            build_dir: build_dir.to_string(),
            region: default_region(),
        },
        ..Default::default()
    };
    config.environments.insert(
        "staging".to_string(),
        EnvironmentConfig {
            region: None,
            domain: Some(DomainConfig::default()),
        },
    );

    let body = toml::to_string_pretty(&config).context("Failed to render default config")?;
    Ok(format!(
        r#"# Edge single-page app configuration
# Generated resource names derive from app.seed. Keep it stable.
# Set domain.hosted_zone_id and domain.certificate_arn to serve aliases, e.g.
#   hosted_zone_id = "Z0123456789ABCDEFGHIJ"
#   certificate_arn = "arn:aws:acm:us-east-1:123456789012:certificate/..."

{}"#,
        body
    ))
}

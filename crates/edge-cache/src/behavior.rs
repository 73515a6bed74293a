//! Distribution cache behavior.

use serde::{Deserialize, Serialize};

/// How the edge treats plain HTTP viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    /// Accept both HTTP and HTTPS.
    AllowAll,
    /// Redirect HTTP to HTTPS.
    #[default]
    RedirectToHttps,
    /// Reject HTTP.
    HttpsOnly,
}

/// Which parts of the viewer request are forwarded to the origin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForwardedValues {
    /// Forward the query string.
    pub query_string: bool,
    /// Cookie forwarding mode.
    pub cookies: CookieForwarding,
}

/// Cookie forwarding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieForwarding {
    #[default]
    None,
    All,
}

/// Cache behavior applied to every path of the distribution.
///
/// The values are fixed: static build artifacts are served read-only, cached
/// for five minutes by default and at most a day, compressed, over HTTPS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBehavior {
    /// Methods the edge accepts.
    pub allowed_methods: Vec<String>,
    /// Methods whose responses are cached.
    pub cached_methods: Vec<String>,
    /// Default time-to-live in seconds.
    pub default_ttl: u64,
    /// Maximum time-to-live in seconds.
    pub max_ttl: u64,
    /// Whether the edge compresses responses.
    pub compress: bool,
    /// Viewer protocol policy.
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    /// Values forwarded to the origin.
    pub forwarded_values: ForwardedValues,
}

impl Default for CacheBehavior {
    fn default() -> Self {
        Self {
            allowed_methods: methods(&["GET", "HEAD", "OPTIONS"]),
            cached_methods: methods(&["GET", "HEAD"]),
            default_ttl: 300,
            max_ttl: 86_400,
            compress: true,
            viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
            forwarded_values: ForwardedValues::default(),
        }
    }
}

fn methods(names: &[&str]) -> Vec<String> {
    names.iter().map(|m| m.to_string()).collect()
}

impl CacheBehavior {
    /// Check whether responses to a method are cached.
    pub fn caches(&self, method: &str) -> bool {
        self.cached_methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_defaults() {
        let behavior = CacheBehavior::default();
        assert_eq!(behavior.allowed_methods, vec!["GET", "HEAD", "OPTIONS"]);
        assert_eq!(behavior.cached_methods, vec!["GET", "HEAD"]);
        assert_eq!(behavior.default_ttl, 300);
        assert_eq!(behavior.max_ttl, 86_400);
        assert!(behavior.compress);
        assert_eq!(
            behavior.viewer_protocol_policy,
            ViewerProtocolPolicy::RedirectToHttps
        );
        assert!(!behavior.forwarded_values.query_string);
    }

    #[test]
    fn test_options_not_cached() {
        let behavior = CacheBehavior::default();
        assert!(behavior.caches("get"));
        assert!(!behavior.caches("OPTIONS"));
    }

    #[test]
    fn test_protocol_policy_serialization() {
        let json = serde_json::to_string(&ViewerProtocolPolicy::RedirectToHttps).unwrap();
        assert_eq!(json, "\"redirect-to-https\"");
    }
}

//! Object-level cache policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cache scope determining who can cache the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// Cacheable by CDN and browser (shared cache).
    Public,
    /// Cacheable by browser only (private cache).
    Private,
    /// No caching.
    #[default]
    None,
}

impl CacheScope {
    /// Get the Cache-Control directive for this scope.
    pub fn cache_control_directive(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::None => "no-store",
        }
    }

    /// Check if this scope allows CDN caching.
    pub fn allows_cdn_caching(&self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Cache policy stamped onto every uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Cache scope.
    pub scope: CacheScope,
    /// Browser time-to-live (`max-age`).
    pub max_age: Duration,
    /// Shared cache time-to-live (`s-maxage`), honoured by the edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_max_age: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            scope: CacheScope::None,
            max_age: Duration::from_secs(0),
            shared_max_age: None,
        }
    }
}

impl CachePolicy {
    /// Create a policy with no caching.
    pub fn none() -> Self {
        Self::default()
    }

    /// Create a public cache policy.
    pub fn public(max_age: Duration) -> Self {
        Self {
            scope: CacheScope::Public,
            max_age,
            ..Default::default()
        }
    }

    /// Policy for single-page app build artifacts: browsers keep objects
    /// for a day, the edge revalidates after five minutes.
    pub fn spa_objects() -> Self {
        Self::public(Duration::from_secs(86_400)).with_shared_max_age(Duration::from_secs(300))
    }

    /// Set the shared cache time-to-live.
    pub fn with_shared_max_age(mut self, duration: Duration) -> Self {
        self.shared_max_age = Some(duration);
        self
    }

    /// Generate Cache-Control header value.
    pub fn cache_control_header(&self) -> String {
        if self.scope == CacheScope::None {
            return "no-store".to_string();
        }

        let mut parts = vec![self.scope.cache_control_directive().to_string()];

        parts.push(format!("max-age={}", self.max_age.as_secs()));

        if let Some(shared) = self.shared_max_age {
            if self.scope.allows_cdn_caching() {
                parts.push(format!("s-maxage={}", shared.as_secs()));
            }
        }

        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spa_objects_header() {
        assert_eq!(
            CachePolicy::spa_objects().cache_control_header(),
            "public, max-age=86400, s-maxage=300"
        );
    }

    #[test]
    fn test_none_is_no_store() {
        assert_eq!(CachePolicy::none().cache_control_header(), "no-store");
    }

    #[test]
    fn test_private_drops_shared_max_age() {
        let policy = CachePolicy {
            scope: CacheScope::Private,
            max_age: Duration::from_secs(60),
            shared_max_age: Some(Duration::from_secs(10)),
        };
        assert_eq!(policy.cache_control_header(), "private, max-age=60");
    }
}

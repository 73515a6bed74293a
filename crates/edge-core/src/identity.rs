//! Unique identity sources for generated resource names.
//!
//! Resource names must not collide between deployments sharing an account,
//! so every generated name carries a short unique suffix. The suffix comes
//! from an [`IdentityProvider`] passed into the composer: a
//! [`SeededIdentity`] derives stable suffixes from a stored seed (repeated
//! runs produce the same names), a [`RandomIdentity`] draws fresh ones.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of bytes in a generated suffix.
pub const UNIQUE_ID_LEN: usize = 6;

/// A short unique suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueId([u8; UNIQUE_ID_LEN]);

impl UniqueId {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; UNIQUE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; UNIQUE_ID_LEN] {
        &self.0
    }

    /// URL-safe base64 rendering (8 characters).
    pub fn b64_url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Lowercase hex rendering (12 characters), safe for DNS-style names.
    pub fn hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.b64_url())
    }
}

/// Source of unique suffixes for generated resource names.
///
/// `purpose` distinguishes the names requested within one deployment
/// (e.g. `"rewrite-function"`, `"bucket"`).
pub trait IdentityProvider: Send + Sync {
    /// Produce the suffix for the given purpose.
    fn unique_id(&self, purpose: &str) -> UniqueId;
}

/// Deterministic provider: the same seed and purpose always give the same suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededIdentity {
    seed: String,
}

impl SeededIdentity {
    /// Create a provider from a stored seed.
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    /// The seed this provider derives from.
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdentityProvider for SeededIdentity {
    fn unique_id(&self, purpose: &str) -> UniqueId {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update([0u8]);
        hasher.update(purpose.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; UNIQUE_ID_LEN];
        bytes.copy_from_slice(&digest[..UNIQUE_ID_LEN]);
        UniqueId(bytes)
    }
}

/// Non-deterministic provider backed by the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentity;

impl RandomIdentity {
    /// Generate a new seed for a [`SeededIdentity`].
    pub fn generate_seed() -> String {
        let bytes: [u8; 24] = rand::thread_rng().gen();
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl IdentityProvider for RandomIdentity {
    fn unique_id(&self, _purpose: &str) -> UniqueId {
        UniqueId(rand::thread_rng().gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_stable() {
        let a = SeededIdentity::new("seed-1");
        let b = SeededIdentity::new("seed-1");
        assert_eq!(a.unique_id("bucket"), b.unique_id("bucket"));
    }

    #[test]
    fn test_seeded_varies_by_purpose_and_seed() {
        let provider = SeededIdentity::new("seed-1");
        assert_ne!(provider.unique_id("bucket"), provider.unique_id("function"));
        assert_ne!(
            provider.unique_id("bucket"),
            SeededIdentity::new("seed-2").unique_id("bucket")
        );
    }

    #[test]
    fn test_renderings() {
        let id = UniqueId::from_bytes([0x00, 0x01, 0xab, 0xff, 0x10, 0x7f]);
        assert_eq!(id.hex(), "0001abff107f");
        assert_eq!(id.b64_url().len(), 8);
        assert!(!id.b64_url().contains('='));
    }

    #[test]
    fn test_random_seed_generation() {
        let s1 = RandomIdentity::generate_seed();
        let s2 = RandomIdentity::generate_seed();
        assert_eq!(s1.len(), 32);
        assert_ne!(s1, s2);
    }
}

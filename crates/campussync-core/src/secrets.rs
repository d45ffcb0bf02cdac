//! Pluggable secret comparison.
//!
//! The credential verifier never compares secrets itself; it asks a
//! [`SecretVerifier`] whether a presented secret matches what was stored.
//! Swapping the scheme (bcrypt for new deployments, plaintext for legacy rows)
//! does not touch any caller.

use bcrypt::{DEFAULT_COST, hash, verify};
use subtle::ConstantTimeEq;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("failed to hash secret: {0}")]
    Hash(String),
    #[error("failed to verify secret: {0}")]
    Verify(String),
}

/// Stores and compares secret strings.
pub trait SecretVerifier: Send + Sync + std::fmt::Debug {
    /// Produces the value to persist for `secret`.
    fn hash(&self, secret: &str) -> Result<String, SecretError>;

    /// Returns whether `presented` matches the persisted `stored` value.
    fn verify(&self, presented: &str, stored: &str) -> Result<bool, SecretError>;

    /// A stored value that never matches, used to keep the work done for an
    /// unknown identifier comparable to a known one.
    fn decoy(&self) -> &str;
}

/// bcrypt hashing with a configurable cost.
#[derive(Debug, Clone)]
pub struct BcryptSecrets {
    cost: u32,
    decoy: String,
}

impl BcryptSecrets {
    pub fn new(cost: u32) -> Result<Self, SecretError> {
        let decoy = hash("campussync-decoy-secret", cost)
            .map_err(|e| SecretError::Hash(e.to_string()))?;
        Ok(Self { cost, decoy })
    }
}

impl BcryptSecrets {
    pub fn with_default_cost() -> Result<Self, SecretError> {
        Self::new(DEFAULT_COST)
    }
}

impl SecretVerifier for BcryptSecrets {
    fn hash(&self, secret: &str) -> Result<String, SecretError> {
        hash(secret, self.cost).map_err(|e| SecretError::Hash(e.to_string()))
    }

    fn verify(&self, presented: &str, stored: &str) -> Result<bool, SecretError> {
        verify(presented, stored).map_err(|e| SecretError::Verify(e.to_string()))
    }

    fn decoy(&self) -> &str {
        &self.decoy
    }
}

/// Plaintext storage with constant-time comparison, for legacy rows.
#[derive(Debug, Clone, Default)]
pub struct PlaintextSecrets;

impl SecretVerifier for PlaintextSecrets {
    fn hash(&self, secret: &str) -> Result<String, SecretError> {
        Ok(secret.to_string())
    }

    fn verify(&self, presented: &str, stored: &str) -> Result<bool, SecretError> {
        Ok(presented.as_bytes().ct_eq(stored.as_bytes()).into())
    }

    fn decoy(&self) -> &str {
        "\u{0}"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast.
    fn fast_bcrypt() -> BcryptSecrets {
        BcryptSecrets::new(4).unwrap()
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let secrets = fast_bcrypt();
        let stored = secrets.hash("correct horse").unwrap();

        assert_ne!(stored, "correct horse");
        assert!(stored.starts_with("$2"));
        assert!(secrets.verify("correct horse", &stored).unwrap());
        assert!(!secrets.verify("battery staple", &stored).unwrap());
    }

    #[test]
    fn test_bcrypt_salts_each_hash() {
        let secrets = fast_bcrypt();
        let first = secrets.hash("pw").unwrap();
        let second = secrets.hash("pw").unwrap();

        assert_ne!(first, second);
        assert!(secrets.verify("pw", &first).unwrap());
        assert!(secrets.verify("pw", &second).unwrap());
    }

    #[test]
    fn test_bcrypt_rejects_malformed_stored_value() {
        let secrets = fast_bcrypt();
        assert!(secrets.verify("pw", "not-a-hash").is_err());
    }

    #[test]
    fn test_bcrypt_decoy_never_matches() {
        let secrets = fast_bcrypt();
        assert!(!secrets.verify("", secrets.decoy()).unwrap());
        assert!(!secrets.verify("pw", secrets.decoy()).unwrap());
    }

    #[test]
    fn test_plaintext_exact_match() {
        let secrets = PlaintextSecrets;
        assert!(secrets.verify("pw", "pw").unwrap());
        assert!(!secrets.verify("pw", "PW").unwrap());
        assert!(!secrets.verify("pw", "pw ").unwrap());
        assert!(!secrets.verify("", "pw").unwrap());
    }

    #[test]
    fn test_plaintext_hash_is_identity() {
        assert_eq!(PlaintextSecrets.hash("pw").unwrap(), "pw");
    }

    #[test]
    fn test_plaintext_decoy_never_matches_empty_secret() {
        let secrets = PlaintextSecrets;
        assert!(!secrets.verify("", secrets.decoy()).unwrap());
    }
}

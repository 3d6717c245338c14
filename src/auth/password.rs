//! Password hashing
//!
//! bcrypt digests in modular-crypt form (`$2b$<cost>$<salt><hash>`), so a
//! stored digest carries everything needed to verify it.

use thiserror::Error;

/// Work factor used unless configured otherwise
pub const DEFAULT_COST: u32 = 14;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a candidate password against a stored digest
    ///
    /// Never fails: a malformed digest counts as a mismatch.
    pub fn verify(&self, digest: &str, candidate: &str) -> bool {
        match bcrypt::verify(candidate, digest) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest could not be parsed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let digest = hasher.hash("secret123").unwrap();

        assert!(hasher.verify(&digest, "secret123"));
        assert!(!hasher.verify(&digest, "secret124"));
    }

    #[test]
    fn test_digest_encodes_cost_and_salt() {
        let hasher = hasher();
        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();

        assert!(first.starts_with("$2b$04$"));
        assert_ne!(first, second);
        assert!(hasher.verify(&second, "secret123"));
    }

    #[test]
    fn test_verify_malformed_digest() {
        assert!(!hasher().verify("not-a-bcrypt-digest", "secret123"));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(PasswordHasher::default().cost(), 14);
    }
}

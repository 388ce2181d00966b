//! Salted credential digests, stored as `<salt-hex>$<digest-hex>`.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SEPARATOR: char = '$';

/// Hash a plaintext password under a fresh random salt.
pub fn hash(plaintext: &str) -> String {
    let salt = hex::encode(Uuid::new_v4().as_bytes());
    let digest = digest(&salt, plaintext);
    format!("{salt}{SEPARATOR}{digest}")
}

/// Verify a candidate password against a stored hash.
///
/// A malformed stored value never verifies.
pub fn verify(candidate: &str, stored: &str) -> bool {
    match stored.split_once(SEPARATOR) {
        Some((salt, expected)) => digest(salt, candidate) == expected,
        None => false,
    }
}

fn digest(salt_hex: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let stored = hash("hunter2");
        assert!(verify("hunter2", &stored));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let stored = hash("hunter2");
        assert!(!verify("hunter3", &stored));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify("hunter2", "no-separator-here"));
        assert!(!verify("hunter2", ""));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash("hunter2");
        let b = hash("hunter2");
        assert_ne!(a, b);
        assert!(verify("hunter2", &a));
        assert!(verify("hunter2", &b));
    }
}

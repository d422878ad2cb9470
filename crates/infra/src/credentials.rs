//! Password hashing behind a trait seam.
//!
//! The concrete algorithm is interchangeable; the argon2id implementation is
//! the default for every environment.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use podharbor_core::{DomainResult, Fault};

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> DomainResult<String>;

    /// Constant-time verification; a malformed stored hash verifies false.
    fn verify(&self, plain: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgonPasswordHasher;

impl PasswordHasher for ArgonPasswordHasher {
    fn hash(&self, plain: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Fault::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = ArgonPasswordHasher;
        let hash = hasher.hash("Str0ng!Pass").unwrap();

        assert!(hasher.verify("Str0ng!Pass", &hash));
        assert!(!hasher.verify("Wr0ng!Pass", &hash));
        assert!(!hasher.verify("Str0ng!Pass", "not-a-phc-string"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = ArgonPasswordHasher;
        let a = hasher.hash("Str0ng!Pass").unwrap();
        let b = hasher.hash("Str0ng!Pass").unwrap();
        assert_ne!(a, b);
    }
}

// Password hashing and verification service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::auth::error::AuthError;

/// One-way salted password hashing using Argon2id.
///
/// The time cost comes from configuration so deployments can tune it without
/// a rebuild; memory cost and parallelism stay at fixed, conservative values.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

const MEMORY_COST_KIB: u32 = 19 * 1024;
const PARALLELISM: u32 = 1;

impl PasswordService {
    pub fn new(time_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(MEMORY_COST_KIB, time_cost, PARALLELISM, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A hash that fails to parse is an internal error, not a mismatch: it
    /// means the stored value was corrupted, and callers should see a 500
    /// rather than a misleading 401.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> PasswordService {
        // Minimal time cost keeps the suite fast
        PasswordService::new(1).unwrap()
    }

    #[test]
    fn test_hash_then_verify_round_trip() {
        let service = test_service();
        let hash = service.hash("secret1").unwrap();
        assert!(service.verify("secret1", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let service = test_service();
        let hash = service.hash("secret1").unwrap();
        assert!(!service.verify("secret2", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = test_service();
        let a = service.hash("secret1").unwrap();
        let b = service.hash("secret1").unwrap();
        assert_ne!(a, b, "two hashes of the same password must differ by salt");
    }

    #[test]
    fn test_corrupted_hash_is_an_error_not_a_mismatch() {
        let service = test_service();
        let result = service.verify("secret1", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::PasswordHash(_))));
    }
}

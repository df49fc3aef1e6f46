// Bearer token issuance and verification

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::error::AuthError;
use crate::auth::models::{Claims, Role};

/// Token service for signing and verifying bearer tokens.
///
/// Admin sessions are short-lived (1 hour); student and parent sessions last
/// a day. Both TTLs are part of the route contract, not configuration.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

const ADMIN_TTL_SECS: i64 = 3600;
const USER_TTL_SECS: i64 = 86400;

impl TokenService {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a 1-hour token for an administrator.
    pub fn issue_admin_token(&self, admin_id: i32, email: &str) -> Result<String, AuthError> {
        self.issue(admin_id, email, Role::Admin, ADMIN_TTL_SECS)
    }

    /// Issue a 24-hour token for a student or parent.
    pub fn issue_user_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.issue(user_id, email, role, USER_TTL_SECS)
    }

    fn issue(&self, sub: i32, email: &str, role: Role, ttl: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify a bearer token and return its claims.
    ///
    /// Expired tokens fail distinctly from malformed or mis-signed ones, so a
    /// raw account id pasted into the Authorization header comes back as
    /// `InvalidToken` and never resolves to an identity.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_admin_token_expires_in_one_hour() {
        let service = test_token_service();
        let token = service.issue_admin_token(1, "a@x.com").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, ADMIN_TTL_SECS);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_user_token_expires_in_one_day() {
        let service = test_token_service();
        let token = service
            .issue_user_token(7, "s@x.com", Role::Student)
            .unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, USER_TTL_SECS);
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn test_claims_carry_identity_and_role() {
        let service = test_token_service();
        let token = service
            .issue_user_token(42, "p@x.com", Role::Parent)
            .unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "p@x.com");
        assert_eq!(claims.role, Role::Parent);
    }

    #[test]
    fn test_expired_token_fails_distinctly() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "s@x.com".to_string(),
            role: Role::Student,
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        for bad in ["", "not.a.token", "42", "admin-id-as-bearer"] {
            assert!(matches!(
                service.verify(bad),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_tokens_signed_with_another_secret_are_rejected() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());

        let token = service1.issue_admin_token(1, "a@x.com").unwrap();
        assert!(service1.verify(&token).is_ok());
        assert!(matches!(
            service2.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_issued_tokens_round_trip(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.issue_user_token(user_id, &email, Role::Student)?;
            let claims = service.verify(&token)?;

            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.role, Role::Student);
        }

        #[test]
        fn prop_random_strings_never_verify(
            garbage in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.verify(&garbage).is_err());
        }
    }
}

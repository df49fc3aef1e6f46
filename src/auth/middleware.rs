// Authenticated-identity extractor for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Authenticated identity injected into protected handlers.
///
/// Extracting this type is the only way a route learns who is calling: the
/// bearer token is verified against the `TokenService` held in application
/// state, so a route can never treat an unverified bearer value as an
/// identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let tokens = TokenService::from_ref(state);
        let claims = tokens.verify(token)?;

        debug!(
            "Authenticated request: sub={}, role={}",
            claims.sub, claims.role
        );

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::auth::models::Claims;

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> TokenService {
        TokenService::new(TEST_SECRET.to_string())
    }

    fn parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        let service = test_token_service();
        let token = service
            .issue_user_token(42, "s@x.com", Role::Student)
            .unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &service)
            .await
            .unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "s@x.com");
        assert_eq!(user.role, Role::Student);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let service = test_token_service();
        let mut parts = parts_without_auth();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &service).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let service = test_token_service();
        for value in ["Basic dXNlcjpwYXNz", "token-without-scheme"] {
            let mut parts = parts_with_auth(value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &service).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
    }

    #[tokio::test]
    async fn test_raw_account_id_as_bearer_is_rejected() {
        // An existing admin id pasted directly into the header must never
        // resolve to an identity.
        let service = test_token_service();
        let mut parts = parts_with_auth("Bearer 1");
        let result = AuthenticatedUser::from_request_parts(&mut parts, &service).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
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
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &service).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }
}

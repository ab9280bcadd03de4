/// Request authentication for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, validates the JWT and
/// produces an [`AuthContext`]. The API's middleware layer calls
/// [`authenticate`] and inserts the context into request extensions, where
/// handlers pick it up with `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use taskboard_shared::auth::middleware::authenticate;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes";
/// let token = create_token(&Claims::new("ada@example.com"), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
///
/// let auth = authenticate(&headers, secret)?;
/// assert_eq!(auth.email, "ada@example.com");
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};

/// Authentication context added to request extensions
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}", auth.email)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Email of the authenticated user (the token subject)
    pub email: String,

    /// Id of the token that authenticated the request
    pub token_id: Uuid,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            token_id: claims.jti,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("{0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

/// Extracts the raw token from an `Authorization: Bearer` header
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if the header is absent or not ASCII
/// - `AuthError::InvalidFormat` if it uses another scheme or the token is empty
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidFormat("Expected Bearer token".to_string())),
    }
}

/// Validates the bearer token in `headers` and builds the auth context
///
/// # Errors
///
/// Returns an [`AuthError`] if the header is missing or malformed, or the
/// token is invalid or expired.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    Ok(AuthContext::from(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new("ada@example.com");
        let jti = claims.jti;

        let context = AuthContext::from(claims);
        assert_eq!(context.email, "ada@example.com");
        assert_eq!(context.token_id, jti);
    }

    #[test]
    fn test_missing_header() {
        let result = authenticate(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_non_bearer_scheme() {
        let basic = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(bearer_token(&basic), Err(AuthError::InvalidFormat(_))));

        let empty = headers_with("Bearer ");
        assert!(matches!(bearer_token(&empty), Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_valid_token() {
        let token = create_token(&Claims::new("ada@example.com"), SECRET).unwrap();

        let context = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap();
        assert_eq!(context.email, "ada@example.com");
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::with_expiration("ada@example.com", Duration::hours(-2));
        let token = create_token(&claims, SECRET).unwrap();

        match authenticate(&headers_with(&format!("Bearer {token}")), SECRET) {
            Err(AuthError::InvalidToken(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("expected expired token error, got {other:?}"),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let token = create_token(&Claims::new("ada@example.com"), "another-secret-key-at-least-32-bytes").unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {token}")), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}

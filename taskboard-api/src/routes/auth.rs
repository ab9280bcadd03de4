/// Authentication endpoint
///
/// # Endpoints
///
/// - `POST /api/login` - Exchange email and password for a JWT
///
/// The token is returned as the plain-text response body. Clients send it
/// back as `Authorization: Bearer <token>` on every other `/api` request.

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::extract::State;
use chrono::Duration;
use serde::Deserialize;
use taskboard_shared::auth::jwt;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// {"username": "hexlet@example.com", "password": "qwerty"}
/// ```
///
/// # Response
///
/// ```text
/// 200 OK
/// Content-Type: text/plain; charset=utf-8
///
/// eyJhbGciOiJIUzI1NiJ9...
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing username or password
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<String> {
    let user = state
        .services
        .users
        .authenticate(&req.username, &req.password)
        .await?;

    let claims = jwt::Claims::with_expiration(
        user.email,
        Duration::hours(state.config.jwt.expiration_hours),
    );
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(token)
}

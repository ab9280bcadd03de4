/// User endpoints
///
/// # Endpoints
///
/// - `GET    /api/users`      - List users (`X-Total-Count`)
/// - `GET    /api/users/:id`  - Get one user
/// - `POST   /api/users`      - Create a user
/// - `PUT    /api/users/:id`  - Update your own account
/// - `DELETE /api/users/:id`  - Delete your own account
///
/// # Representation
///
/// ```json
/// {
///   "id": 1,
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "email": "ada@example.com",
///   "createdAt": "2024-01-01T12:00:00Z"
/// }
/// ```
///
/// The password hash is never returned.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{
        field_error,
        length_between,
        not_blank,
        Path,
        ValidatedJson,
        ValidationCollector,
        MAX_TEXT_LENGTH,
    },
    routes::ListResponse,
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::user::User,
    patch::Patch,
    services::user::{NewUser, UserChanges},
};
use validator::{Validate, ValidateEmail, ValidationErrors};

/// User representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub last_name: Option<String>,

    #[validate(
        email(message = "must be a valid email"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 3, message = "must be at least 3 characters")
    )]
    pub password: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Update user request; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Patch<String>,

    #[serde(default)]
    pub last_name: Patch<String>,

    #[serde(default)]
    pub email: Patch<String>,

    #[serde(default)]
    pub password: Patch<String>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut collector = ValidationCollector::default();

        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if let Some(value) = value.as_value() {
                collector.check(field, length_between(value, 0, Some(MAX_TEXT_LENGTH)), || {
                    field_error("length", "must be at most 255 characters")
                });
            }
        }
        if let Some(email) = self.email.as_value() {
            collector.check("email", email.validate_email(), || {
                field_error("email", "must be a valid email")
            });
            collector.check("email", length_between(email, 0, Some(MAX_TEXT_LENGTH)), || {
                field_error("length", "must be at most 255 characters")
            });
        }
        if let Some(password) = self.password.as_value() {
            collector.record("password", not_blank(password));
            collector.check("password", length_between(password, 3, None), || {
                field_error("length", "must be at least 3 characters")
            });
        }

        collector.finish()
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<ListResponse<UserResponse>> {
    let users = state.services.users.list().await?;
    Ok(users.into_iter().collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.services.users.find_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Create a user
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email or password shorter than 3 characters
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.services.users.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user
///
/// # Errors
///
/// - `404 Not Found`: No such user
/// - `403 Forbidden`: Not your account
/// - `400 Bad Request`: Invalid field, or `null` email/password
/// - `409 Conflict`: Email already exists
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .update(id, &auth.email, req.into())
        .await?;
    Ok(Json(user.into()))
}

/// Delete a user
///
/// # Errors
///
/// - `403 Forbidden`: Not your account
/// - `405 Method Not Allowed`: Tasks are still assigned to the user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.users.delete(id, &auth.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

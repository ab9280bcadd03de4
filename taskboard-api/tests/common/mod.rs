/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (migrations and default statuses/labels)
/// - Test user creation with a known password
/// - JWT token generation
/// - Request helpers
///
/// Tests need a PostgreSQL database in `DATABASE_URL`; when it is not set,
/// [`TestContext::new`] returns `None` and the test returns early.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::db::migrations::run_migrations;
use taskboard_shared::db::seed::{seed_defaults, AdminAccount};
use taskboard_shared::models::user::{CreateUser, User};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse";

const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

/// A response split into status, headers and parsed JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a test context, or `None` when no database is configured
    pub async fn new() -> Option<Self> {
        let database_url = std::env::var("DATABASE_URL").ok()?;

        let vars = HashMap::from([
            ("DATABASE_URL".to_string(), database_url),
            ("JWT_SECRET".to_string(), TEST_SECRET.to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let db = PgPool::connect(&config.database.url).await.unwrap();
        run_migrations(&db).await.unwrap();

        // Unique admin per context so parallel tests never race on it
        seed_defaults(
            &db,
            &AdminAccount {
                email: unique_email("admin"),
                password: TEST_PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();

        let user = create_user(&db, "owner").await;
        let jwt_token = token_for(&user.email);
        let app = build_router(AppState::new(db.clone(), config.clone()));

        Some(Self {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a request authenticated as the context user
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        self.request_as(&self.jwt_token, method, uri, body).await
    }

    /// Sends a request with an explicit bearer token
    pub async fn request_as(
        &self,
        token: &str,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        send(self.app.clone(), request).await
    }
}

/// Sends a raw request through the router
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Inserts a user directly with [`TEST_PASSWORD`]
pub async fn create_user(db: &PgPool, prefix: &str) -> User {
    User::create(
        db,
        CreateUser {
            first_name: Some("Test".to_string()),
            last_name: Some(prefix.to_string()),
            email: unique_email(prefix),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap()
}

/// Issues a token for `email` signed with the test secret
pub fn token_for(email: &str) -> String {
    create_token(&Claims::new(email.to_string()), TEST_SECRET).unwrap()
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Task indexes are unique across the table, so tests draw random ones
pub fn unique_index() -> i64 {
    (Uuid::new_v4().as_u128() % 1_000_000_000_000) as i64
}

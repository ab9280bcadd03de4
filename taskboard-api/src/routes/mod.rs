/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login
/// - `users`: User accounts
/// - `task_statuses`: Task statuses
/// - `labels`: Labels
/// - `tasks`: Tasks, with filtering
///
/// Each resource module defines its request and response types next to the
/// handlers. List endpoints return a [`ListResponse`], which adds the
/// `X-Total-Count` header.

pub mod auth;
pub mod health;
pub mod labels;
pub mod task_statuses;
pub mod tasks;
pub mod users;

use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Header carrying the number of items in a list response
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// JSON array response with an `X-Total-Count` header
#[derive(Debug)]
pub struct ListResponse<T>(pub Vec<T>);

impl<T> IntoResponse for ListResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let count = HeaderValue::from(self.0.len());
        let mut response = Json(self.0).into_response();
        response.headers_mut().insert(TOTAL_COUNT_HEADER, count);
        response
    }
}

impl<T, U> FromIterator<U> for ListResponse<T>
where
    U: Into<T>,
{
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        ListResponse(iter.into_iter().map(Into::into).collect())
    }
}

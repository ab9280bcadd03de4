/// Task status endpoints
///
/// # Endpoints
///
/// - `GET    /api/task_statuses`      - List statuses (`X-Total-Count`)
/// - `GET    /api/task_statuses/:id`  - Get one status
/// - `POST   /api/task_statuses`      - Create a status
/// - `PUT    /api/task_statuses/:id`  - Update a status
/// - `DELETE /api/task_statuses/:id`  - Delete a status no task uses
///
/// # Representation
///
/// ```json
/// {"id": 1, "name": "Draft", "slug": "draft", "createdAt": "2024-01-01T12:00:00Z"}
/// ```

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
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    models::task_status::TaskStatus,
    patch::Patch,
    services::task_status::{NewTaskStatus, TaskStatusChanges},
};
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<TaskStatus> for TaskStatusResponse {
    fn from(status: TaskStatus) -> Self {
        Self {
            id: status.id,
            name: status.name,
            slug: status.slug,
            created_at: status.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskStatusRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 1, max = 255, message = "must be between 1 and 255 characters")
    )]
    pub name: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 1, max = 255, message = "must be between 1 and 255 characters")
    )]
    pub slug: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskStatusRequest {
    #[serde(default)]
    pub name: Patch<String>,

    #[serde(default)]
    pub slug: Patch<String>,
}

impl Validate for UpdateTaskStatusRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut collector = ValidationCollector::default();

        for (field, value) in [("name", &self.name), ("slug", &self.slug)] {
            if let Some(value) = value.as_value() {
                collector.record(field, not_blank(value));
                collector.check(field, length_between(value, 1, Some(MAX_TEXT_LENGTH)), || {
                    field_error("length", "must be between 1 and 255 characters")
                });
            }
        }

        collector.finish()
    }
}

pub async fn list_task_statuses(
    State(state): State<AppState>,
) -> ApiResult<ListResponse<TaskStatusResponse>> {
    let statuses = state.services.task_statuses.list().await?;
    Ok(statuses.into_iter().collect())
}

pub async fn get_task_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskStatusResponse>> {
    let status = state.services.task_statuses.find_by_id(id).await?;
    Ok(Json(status.into()))
}

/// Create a task status
///
/// # Errors
///
/// - `400 Bad Request`: Empty name or slug
/// - `409 Conflict`: Name or slug already used
pub async fn create_task_status(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskStatusRequest>,
) -> ApiResult<(StatusCode, Json<TaskStatusResponse>)> {
    let status = state
        .services
        .task_statuses
        .create(NewTaskStatus {
            name: req.name,
            slug: req.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(status.into())))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateTaskStatusRequest>,
) -> ApiResult<Json<TaskStatusResponse>> {
    let status = state
        .services
        .task_statuses
        .update(
            id,
            TaskStatusChanges {
                name: req.name,
                slug: req.slug,
            },
        )
        .await?;
    Ok(Json(status.into()))
}

/// Delete a task status
///
/// # Errors
///
/// - `404 Not Found`: No such status
/// - `405 Method Not Allowed`: Some task still has this status
pub async fn delete_task_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.task_statuses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

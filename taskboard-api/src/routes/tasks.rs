/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /api/tasks`      - List tasks, filtered by query string (`X-Total-Count`)
/// - `GET    /api/tasks/:id`  - Get one task
/// - `POST   /api/tasks`      - Create a task
/// - `PUT    /api/tasks/:id`  - Partially update a task
/// - `DELETE /api/tasks/:id`  - Delete a task
///
/// # Filters
///
/// ```text
/// GET /api/tasks?titleCont=report&assigneeId=5&status=draft&labelId=2
/// ```
///
/// All parameters are optional and combined with AND.
///
/// # Representation
///
/// ```json
/// {
///   "id": 7,
///   "index": 3,
///   "createdAt": "2024-01-01T12:00:00Z",
///   "assignee_id": 5,
///   "title": "Write release notes",
///   "content": "Cover the new filters",
///   "status": "draft",
///   "taskLabelIds": [1, 2]
/// }
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{
        field_error,
        length_between,
        not_blank,
        Path,
        Query,
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
    models::{task::TaskView, task_filter::TaskFilter},
    patch::Patch,
    services::task::{NewTask, TaskChanges},
};
use validator::{Validate, ValidationErrors};

/// Task representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,

    pub index: Option<i64>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    pub assignee_id: Option<i64>,

    pub title: String,

    pub content: Option<String>,

    /// Status slug
    pub status: String,

    #[serde(rename = "taskLabelIds")]
    pub task_label_ids: Vec<i64>,
}

impl From<TaskView> for TaskResponse {
    fn from(task: TaskView) -> Self {
        Self {
            id: task.id,
            index: task.index,
            created_at: task.created_at,
            assignee_id: task.assignee_id,
            title: task.name,
            content: task.description,
            status: task.status_slug,
            task_label_ids: task.label_ids,
        }
    }
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 1, max = 255, message = "must be between 1 and 255 characters")
    )]
    pub title: String,

    pub index: Option<i64>,

    pub content: Option<String>,

    pub assignee_id: Option<i64>,

    /// Status slug
    #[validate(
        custom(function = "not_blank"),
        length(min = 1, max = 255, message = "must be between 1 and 255 characters")
    )]
    pub status: String,

    #[serde(rename = "taskLabelIds")]
    pub task_label_ids: Option<Vec<i64>>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            index: req.index,
            content: req.content,
            assignee_id: req.assignee_id,
            status: req.status,
            label_ids: req.task_label_ids.unwrap_or_default(),
        }
    }
}

/// Update task request
///
/// Missing fields are left unchanged. `null` clears `index`, `content`,
/// `assignee_id` and `taskLabelIds`; it is rejected for `title` and `status`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Patch<String>,

    #[serde(default)]
    pub index: Patch<i64>,

    #[serde(default)]
    pub content: Patch<String>,

    #[serde(default)]
    pub assignee_id: Patch<i64>,

    #[serde(default)]
    pub status: Patch<String>,

    #[serde(default, rename = "taskLabelIds")]
    pub task_label_ids: Patch<Vec<i64>>,
}

impl Validate for UpdateTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut collector = ValidationCollector::default();

        for (field, value) in [("title", &self.title), ("status", &self.status)] {
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

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            index: req.index,
            content: req.content,
            assignee_id: req.assignee_id,
            status: req.status,
            label_ids: req.task_label_ids,
        }
    }
}

/// List tasks matching the query-string filters
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<ListResponse<TaskResponse>> {
    let tasks = state.services.tasks.list(&filter).await?;
    Ok(tasks.into_iter().collect())
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.services.tasks.find_by_id(id).await?;
    Ok(Json(task.into()))
}

/// Create a task
///
/// # Errors
///
/// - `400 Bad Request`: Empty title or status
/// - `404 Not Found`: Unknown status slug, assignee or label
/// - `409 Conflict`: Index already used
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = state.services.tasks.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Partially update a task
///
/// # Errors
///
/// - `404 Not Found`: No such task, or unknown status slug, assignee or label
/// - `400 Bad Request`: Empty or `null` title or status
/// - `409 Conflict`: Index already used
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.services.tasks.update(id, req.into()).await?;
    Ok(Json(task.into()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Task management
///
/// Tasks reference their status by slug and their labels by id in the API
/// payloads; this service resolves those references inside the same
/// transaction as the write, so a task never points at a missing status,
/// label or assignee.

use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use crate::models::label::Label;
use crate::models::task::{CreateTask, Task, TaskView, UpdateTask};
use crate::models::task_filter::TaskFilter;
use crate::models::task_status::TaskStatus;
use crate::models::user::User;
use crate::patch::Patch;

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub index: Option<i64>,
    pub content: Option<String>,
    pub assignee_id: Option<i64>,

    /// Status slug
    pub status: String,

    pub label_ids: Vec<i64>,
}

/// Partial update of a task
///
/// `title` and `status` cannot be null. A null `label_ids` removes all labels,
/// a null `assignee_id` unassigns the task.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Patch<String>,
    pub index: Patch<i64>,
    pub content: Patch<String>,
    pub assignee_id: Patch<i64>,
    pub status: Patch<String>,
    pub label_ids: Patch<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct TaskService {
    pool: PgPool,
}

/// Sorts and deduplicates requested label ids
fn normalize_label_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// First requested id that is not in `existing` (both sorted ascending)
fn first_missing(requested: &[i64], existing: &[i64]) -> Option<i64> {
    requested
        .iter()
        .copied()
        .find(|id| existing.binary_search(id).is_err())
}

async fn resolve_status(conn: &mut PgConnection, slug: &str) -> ServiceResult<i64> {
    TaskStatus::find_by_slug(conn, slug)
        .await?
        .map(|status| status.id)
        .ok_or_else(|| ServiceError::NotFound(format!("Task status with slug '{slug}' not found")))
}

async fn ensure_assignee(conn: &mut PgConnection, user_id: i64) -> ServiceResult<()> {
    match User::find_by_id(conn, user_id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::not_found("User", user_id)),
    }
}

async fn resolve_labels(conn: &mut PgConnection, ids: Vec<i64>) -> ServiceResult<Vec<i64>> {
    let ids = normalize_label_ids(ids);
    if ids.is_empty() {
        return Ok(ids);
    }

    let existing = Label::find_existing_ids(conn, &ids).await?;
    match first_missing(&ids, &existing) {
        Some(missing) => Err(ServiceError::not_found("Label", missing)),
        None => Ok(ids),
    }
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists tasks matching `filter`, ordered by id
    pub async fn list(&self, filter: &TaskFilter) -> ServiceResult<Vec<TaskView>> {
        debug!(?filter, "Listing tasks");
        Ok(Task::list_views(&self.pool, filter).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<TaskView> {
        Task::find_view_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))
    }

    /// Creates a task with its labels
    ///
    /// # Errors
    ///
    /// `NotFound` if the status slug, assignee or any label does not exist.
    pub async fn create(&self, input: NewTask) -> ServiceResult<TaskView> {
        let mut tx = self.pool.begin().await?;

        let task_status_id = resolve_status(&mut tx, &input.status).await?;
        if let Some(assignee_id) = input.assignee_id {
            ensure_assignee(&mut tx, assignee_id).await?;
        }
        let label_ids = resolve_labels(&mut tx, input.label_ids).await?;

        let task = Task::create(
            &mut *tx,
            CreateTask {
                name: input.title,
                index: input.index,
                description: input.content,
                task_status_id,
                assignee_id: input.assignee_id,
            },
        )
        .await?;

        Task::replace_labels(&mut tx, task.id, &label_ids).await?;

        let view = Task::find_view_by_id(&mut *tx, task.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", task.id))?;

        tx.commit().await?;

        info!(task_id = view.id, status = %view.status_slug, "Task created");
        Ok(view)
    }

    /// Applies a partial update
    ///
    /// Fields absent from `changes` keep their current values.
    pub async fn update(&self, id: i64, changes: TaskChanges) -> ServiceResult<TaskView> {
        let mut tx = self.pool.begin().await?;

        if Task::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(ServiceError::not_found("Task", id));
        }

        let name = changes.title.into_required("title")?;
        let task_status_id = match changes.status.into_required("status")? {
            Some(slug) => Some(resolve_status(&mut tx, &slug).await?),
            None => None,
        };

        let assignee_id = changes.assignee_id.into_option();
        if let Some(Some(user_id)) = assignee_id {
            ensure_assignee(&mut tx, user_id).await?;
        }

        let label_ids = match changes.label_ids {
            Patch::Absent => None,
            Patch::Null => Some(Vec::new()),
            Patch::Value(ids) => Some(resolve_labels(&mut tx, ids).await?),
        };

        let update = UpdateTask {
            name,
            index: changes.index.into_option(),
            description: changes.content.into_option(),
            task_status_id,
            assignee_id,
        };

        if !update.is_empty() {
            Task::update(&mut *tx, id, update)
                .await?
                .ok_or_else(|| ServiceError::not_found("Task", id))?;
        }

        if let Some(label_ids) = label_ids {
            Task::replace_labels(&mut tx, id, &label_ids).await?;
        }

        let view = Task::find_view_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))?;

        tx.commit().await?;

        info!(task_id = id, "Task updated");
        Ok(view)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !Task::delete(&self.pool, id).await? {
            return Err(ServiceError::not_found("Task", id));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_ids() {
        assert_eq!(normalize_label_ids(vec![3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(normalize_label_ids(Vec::new()).is_empty());
    }

    #[test]
    fn test_first_missing() {
        assert_eq!(first_missing(&[1, 2, 3], &[1, 2, 3]), None);
        assert_eq!(first_missing(&[1, 2, 5, 9], &[1, 2]), Some(5));
        assert_eq!(first_missing(&[4], &[]), Some(4));
    }

    #[test]
    fn test_task_changes_default_changes_nothing() {
        let changes = TaskChanges::default();
        assert!(changes.title.is_absent());
        assert!(changes.status.is_absent());
        assert!(changes.label_ids.is_absent());
    }
}

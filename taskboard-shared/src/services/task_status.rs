/// Task status management

use sqlx::PgPool;
use tracing::info;

use super::error::{ServiceError, ServiceResult};
use crate::models::task::Task;
use crate::models::task_status::{CreateTaskStatus, TaskStatus, UpdateTaskStatus};
use crate::patch::Patch;

#[derive(Debug, Clone)]
pub struct NewTaskStatus {
    pub name: String,
    pub slug: String,
}

/// Partial update of a task status; neither field may be cleared
#[derive(Debug, Clone, Default)]
pub struct TaskStatusChanges {
    pub name: Patch<String>,
    pub slug: Patch<String>,
}

#[derive(Debug, Clone)]
pub struct TaskStatusService {
    pool: PgPool,
}

impl TaskStatusService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ServiceResult<Vec<TaskStatus>> {
        Ok(TaskStatus::list(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<TaskStatus> {
        TaskStatus::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task status", id))
    }

    pub async fn create(&self, input: NewTaskStatus) -> ServiceResult<TaskStatus> {
        let status = TaskStatus::create(
            &self.pool,
            CreateTaskStatus {
                name: input.name,
                slug: input.slug,
            },
        )
        .await?;

        info!(task_status_id = status.id, slug = %status.slug, "Task status created");
        Ok(status)
    }

    pub async fn update(&self, id: i64, changes: TaskStatusChanges) -> ServiceResult<TaskStatus> {
        let update = UpdateTaskStatus {
            name: changes.name.into_required("name")?,
            slug: changes.slug.into_required("slug")?,
        };

        let status = TaskStatus::update(&self.pool, id, update)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task status", id))?;

        info!(task_status_id = status.id, "Task status updated");
        Ok(status)
    }

    /// Deletes a status unless some task is still in it
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        if TaskStatus::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(ServiceError::not_found("Task status", id));
        }

        if Task::exists_with_status(&mut *tx, id).await? {
            return Err(ServiceError::AssociatedEntityExists(
                "Task status is used by one or more tasks".to_string(),
            ));
        }

        TaskStatus::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(task_status_id = id, "Task status deleted");
        Ok(())
    }
}

/// Task status model and database operations
///
/// A task status is a named workflow stage ("Draft", "To review", ...) with a
/// URL-friendly slug. Tasks refer to their status by id; API clients refer to
/// it by slug.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_statuses (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL UNIQUE,
///     slug VARCHAR(255) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};

/// A workflow stage a task can be in
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStatus {
    pub id: i64,

    /// Display name, unique
    pub name: String,

    /// Machine name, unique (e.g. "to_review")
    pub slug: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a task status
#[derive(Debug, Clone)]
pub struct CreateTaskStatus {
    pub name: String,
    pub slug: String,
}

/// Input for updating a task status (`None` = unchanged)
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskStatus {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl UpdateTaskStatus {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }
}

impl TaskStatus {
    /// Inserts a new task status
    ///
    /// # Errors
    ///
    /// Fails with a unique violation if the name or slug is already used.
    pub async fn create<'e, E>(executor: E, data: CreateTaskStatus) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskStatus>(
            r#"
            INSERT INTO task_statuses (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .fetch_one(executor)
        .await
    }

    /// Inserts a task status unless one with the same name or slug exists
    ///
    /// Returns `true` if a row was inserted. Used by the startup seeder.
    pub async fn create_if_absent<'e, E>(
        executor: E,
        data: CreateTaskStatus,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO task_statuses (name, slug)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Looks a status up by slug, as referenced in task payloads
    pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(executor)
        .await
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses ORDER BY id",
        )
        .fetch_all(executor)
        .await
    }

    /// Applies a partial update, returning `None` if the id is unknown
    ///
    /// An empty update just reads the row back.
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateTaskStatus,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if data.is_empty() {
            return Self::find_by_id(executor, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE task_statuses SET ");
        let mut assignments = query.separated(", ");
        if let Some(name) = data.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        if let Some(slug) = data.slug {
            assignments.push("slug = ").push_bind_unseparated(slug);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING id, name, slug, created_at");

        query
            .build_query_as::<TaskStatus>()
            .fetch_optional(executor)
            .await
    }

    /// Deletes a status, returning whether a row was removed
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM task_statuses WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_status_is_empty() {
        assert!(UpdateTaskStatus::default().is_empty());
        assert!(!UpdateTaskStatus {
            slug: Some("done".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}

/// Label model and database operations
///
/// Labels are free-form tags attached to tasks through the `task_labels`
/// join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE labels (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(1000) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    pub id: i64,

    /// Unique label name (e.g. "bug")
    pub name: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub name: String,
}

/// Input for updating a label (`None` = unchanged)
#[derive(Debug, Clone, Default)]
pub struct UpdateLabel {
    pub name: Option<String>,
}

impl Label {
    /// Inserts a new label
    ///
    /// # Errors
    ///
    /// Fails with a unique violation (`labels_name_key`) if the name is taken.
    pub async fn create<'e, E>(executor: E, data: CreateLabel) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Label>(
            "INSERT INTO labels (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(data.name)
        .fetch_one(executor)
        .await
    }

    /// Inserts a label unless the name already exists; returns `true` if inserted
    pub async fn create_if_absent<'e, E>(executor: E, data: CreateLabel) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("INSERT INTO labels (name) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(data.name)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Returns the subset of `ids` that exist, in ascending order
    ///
    /// Used to validate the label ids referenced by a task payload.
    pub async fn find_existing_ids<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT id FROM labels WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels ORDER BY id")
            .fetch_all(executor)
            .await
    }

    /// Applies a partial update, returning `None` if the id is unknown
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateLabel,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        match data.name {
            Some(name) => {
                sqlx::query_as::<_, Label>(
                    "UPDATE labels SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
                )
                .bind(id)
                .bind(name)
                .fetch_optional(executor)
                .await
            }
            None => Self::find_by_id(executor, id).await,
        }
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Task model and database operations
///
/// A task has a title (`name`), an optional unique ordering `index`, an
/// optional description, a mandatory status, an optional assignee and any
/// number of labels.
///
/// Rows are read in two shapes:
///
/// - [`Task`]: the bare `tasks` row, used when checking existence and updating
/// - [`TaskView`]: the row joined with its status slug and label ids, which is
///   what the API returns
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     "index" BIGINT UNIQUE,
///     description TEXT,
///     task_status_id BIGINT NOT NULL REFERENCES task_statuses(id) ON DELETE RESTRICT,
///     assignee_id BIGINT REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_labels (
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     label_id BIGINT NOT NULL REFERENCES labels(id) ON DELETE RESTRICT,
///     PRIMARY KEY (task_id, label_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task};
/// use taskboard_shared::models::task_filter::TaskFilter;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
/// let task = Task::create(&mut *tx, CreateTask {
///     name: "Write release notes".to_string(),
///     index: Some(1),
///     description: None,
///     task_status_id: 1,
///     assignee_id: None,
/// })
/// .await?;
/// Task::replace_labels(&mut tx, task.id, &[1, 2]).await?;
/// tx.commit().await?;
///
/// let drafts = Task::list_views(&pool, &TaskFilter::new().with_status("draft")).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor, Postgres, QueryBuilder};

use super::task_filter::TaskFilter;

const VIEW_SELECT: &str = r#"
    SELECT t.id, t.name, t."index", t.description, t.task_status_id, t.assignee_id,
           t.created_at, ts.slug AS status_slug,
           ARRAY(
               SELECT tl.label_id FROM task_labels tl
               WHERE tl.task_id = t.id
               ORDER BY tl.label_id
           ) AS label_ids
    FROM tasks t
    JOIN task_statuses ts ON ts.id = t.task_status_id
"#;

/// A row of the `tasks` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,

    /// Task title
    pub name: String,

    /// Optional unique ordering number
    pub index: Option<i64>,

    pub description: Option<String>,

    pub task_status_id: i64,

    pub assignee_id: Option<i64>,

    pub created_at: DateTime<Utc>,
}

/// A task together with its status slug and label ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskView {
    pub id: i64,
    pub name: String,
    pub index: Option<i64>,
    pub description: Option<String>,
    pub task_status_id: i64,
    pub assignee_id: Option<i64>,
    pub created_at: DateTime<Utc>,

    /// Slug of the task's status
    pub status_slug: String,

    /// Ids of attached labels, ascending
    pub label_ids: Vec<i64>,
}

/// Input for creating a task; labels are attached separately
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub name: String,
    pub index: Option<i64>,
    pub description: Option<String>,
    pub task_status_id: i64,
    pub assignee_id: Option<i64>,
}

/// Input for updating a task
///
/// `None` leaves a column unchanged; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub index: Option<Option<i64>>,
    pub description: Option<Option<String>>,
    pub task_status_id: Option<i64>,
    pub assignee_id: Option<Option<i64>>,
}

impl UpdateTask {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.index.is_none()
            && self.description.is_none()
            && self.task_status_id.is_none()
            && self.assignee_id.is_none()
    }
}

impl Task {
    /// Inserts a new task row
    ///
    /// # Errors
    ///
    /// Fails with a unique violation (`tasks_index_key`) if the index is taken,
    /// or a foreign key violation if the status or assignee does not exist.
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, "index", description, task_status_id, assignee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, "index", description, task_status_id, assignee_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.index)
        .bind(data.description)
        .bind(data.task_status_id)
        .bind(data.assignee_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, "index", description, task_status_id, assignee_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Loads the joined view of one task
    pub async fn find_view_by_id<'e, E>(executor: E, id: i64) -> Result<Option<TaskView>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        query.push(" WHERE t.id = ").push_bind(id);

        query
            .build_query_as::<TaskView>()
            .fetch_optional(executor)
            .await
    }

    /// Lists tasks matching `filter`, ordered by id
    pub async fn list_views<'e, E>(executor: E, filter: &TaskFilter) -> Result<Vec<TaskView>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        filter.push_predicates(&mut query);
        query.push(" ORDER BY t.id");

        query.build_query_as::<TaskView>().fetch_all(executor).await
    }

    /// Applies a partial update, returning `None` if the id is unknown
    ///
    /// An empty update just reads the row back.
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if data.is_empty() {
            return Self::find_by_id(executor, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE tasks SET ");
        let mut assignments = query.separated(", ");

        if let Some(name) = data.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        if let Some(index) = data.index {
            assignments.push("\"index\" = ").push_bind_unseparated(index);
        }
        if let Some(description) = data.description {
            assignments.push("description = ").push_bind_unseparated(description);
        }
        if let Some(task_status_id) = data.task_status_id {
            assignments.push("task_status_id = ").push_bind_unseparated(task_status_id);
        }
        if let Some(assignee_id) = data.assignee_id {
            assignments.push("assignee_id = ").push_bind_unseparated(assignee_id);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(
            r#" RETURNING id, name, "index", description, task_status_id, assignee_id, created_at"#,
        );

        query.build_query_as::<Task>().fetch_optional(executor).await
    }

    /// Replaces the label set of a task
    ///
    /// Takes a connection rather than a generic executor because it runs two
    /// statements; call it with `&mut tx` inside the surrounding transaction.
    pub async fn replace_labels(
        conn: &mut PgConnection,
        task_id: i64,
        label_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *conn)
            .await?;

        if !label_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO task_labels (task_id, label_id)
                SELECT $1, label_id FROM UNNEST($2::BIGINT[]) AS label_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(task_id)
            .bind(label_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Deletes a task; its label associations cascade
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether any task is in the given status
    pub async fn exists_with_status<'e, E>(executor: E, task_status_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE task_status_id = $1)")
            .bind(task_status_id)
            .fetch_one(executor)
            .await
    }

    /// Whether any task is assigned to the given user
    pub async fn exists_with_assignee<'e, E>(executor: E, user_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE assignee_id = $1)")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Whether any task carries the given label
    pub async fn exists_with_label<'e, E>(executor: E, label_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM task_labels WHERE label_id = $1)")
            .bind(label_id)
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let clear_assignee = UpdateTask {
            assignee_id: Some(None),
            ..Default::default()
        };
        assert!(!clear_assignee.is_empty());
    }

    #[test]
    fn test_list_query_shape() {
        let mut query = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        TaskFilter::new().with_status("draft").push_predicates(&mut query);
        query.push(" ORDER BY t.id");

        let sql = query.sql();
        assert!(sql.contains("JOIN task_statuses ts ON ts.id = t.task_status_id"));
        assert!(sql.contains("WHERE ts.slug = $1 ORDER BY t.id"));
    }
}

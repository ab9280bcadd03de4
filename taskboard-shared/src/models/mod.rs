/// Database models for Taskboard
///
/// This module contains all database models and their queries. Every query
/// function takes a `PgExecutor`, so the same code runs against the pool or
/// inside a transaction.
///
/// # Models
///
/// - `user`: User accounts (task assignees)
/// - `task_status`: Workflow stages, addressed by slug
/// - `label`: Tags attached to tasks
/// - `task`: Tasks and their label associations
/// - `task_filter`: Optional criteria for listing tasks
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::label::{CreateLabel, Label};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let label = Label::create(&pool, CreateLabel {
///     name: "feature".to_string(),
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod label;
pub mod task;
pub mod task_filter;
pub mod task_status;
pub mod user;

/// Business logic for Taskboard
///
/// Services sit between the HTTP handlers and the models. They own the
/// cross-entity rules: account ownership, deletion guards for statuses,
/// labels and users still referenced by tasks, and resolving the status slug
/// and label ids in task payloads.
///
/// All services are cheap to clone; each holds a `PgPool` handle.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::services::Services;
/// use taskboard_shared::services::label::NewLabel;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let services = Services::new(pool);
///
/// let label = services.labels.create(NewLabel { name: "urgent".to_string() }).await?;
/// services.labels.delete(label.id).await?;
/// # Ok(())
/// # }
/// ```

pub mod error;
pub mod label;
pub mod task;
pub mod task_status;
pub mod user;

pub use error::{ServiceError, ServiceResult};

use sqlx::PgPool;

/// All services, wired to one connection pool
#[derive(Debug, Clone)]
pub struct Services {
    pub users: user::UserService,
    pub task_statuses: task_status::TaskStatusService,
    pub labels: label::LabelService,
    pub tasks: task::TaskService,
}

impl Services {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: user::UserService::new(pool.clone()),
            task_statuses: task_status::TaskStatusService::new(pool.clone()),
            labels: label::LabelService::new(pool.clone()),
            tasks: task::TaskService::new(pool),
        }
    }
}

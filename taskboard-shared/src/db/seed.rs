/// Default data loaded at startup
///
/// Seeding is idempotent: existing rows (matched by email, name or slug) are
/// left alone, so it is safe to run on every boot.

use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::password::{hash_password_async, PasswordError};
use crate::models::label::{CreateLabel, Label};
use crate::models::task_status::{CreateTaskStatus, TaskStatus};
use crate::models::user::{CreateUser, User};

/// Task statuses created on first start, as `(slug, name)`
pub const DEFAULT_TASK_STATUSES: &[(&str, &str)] = &[
    ("draft", "Draft"),
    ("to_review", "To review"),
    ("to_be_fixed", "To be fixed"),
    ("to_publish", "To publish"),
    ("published", "Published"),
];

pub const DEFAULT_LABELS: &[&str] = &["feature", "bug"];

/// Error type for seeding
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to hash admin password: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credentials of the account created on first start
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub task_statuses_created: usize,
    pub labels_created: usize,
}

/// Inserts the admin account, default statuses and default labels if missing
///
/// # Errors
///
/// Returns an error if hashing the admin password or any insert fails.
pub async fn seed_defaults(pool: &PgPool, admin: &AdminAccount) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if User::find_by_email(pool, &admin.email).await?.is_none() {
        let password_hash = hash_password_async(admin.password.clone()).await?;
        User::create(
            pool,
            CreateUser {
                first_name: None,
                last_name: None,
                email: admin.email.clone(),
                password_hash,
            },
        )
        .await?;
        report.admin_created = true;
    } else {
        debug!("Admin account already exists");
    }

    let mut tx = pool.begin().await?;

    for (slug, name) in DEFAULT_TASK_STATUSES {
        let created = TaskStatus::create_if_absent(
            &mut *tx,
            CreateTaskStatus {
                name: (*name).to_string(),
                slug: (*slug).to_string(),
            },
        )
        .await?;
        if created {
            report.task_statuses_created += 1;
        }
    }

    for name in DEFAULT_LABELS {
        let created = Label::create_if_absent(
            &mut *tx,
            CreateLabel {
                name: (*name).to_string(),
            },
        )
        .await?;
        if created {
            report.labels_created += 1;
        }
    }

    tx.commit().await?;

    info!(
        admin_created = report.admin_created,
        task_statuses_created = report.task_statuses_created,
        labels_created = report.labels_created,
        "Seed data applied"
    );

    Ok(report)
}

/// Integration tests for the domain services
///
/// Exercise the rules that need a database: reference resolution, partial
/// updates, delete guards and ownership. Tests return early when
/// `DATABASE_URL` is not set.

use sqlx::PgPool;
use taskboard_shared::db::migrations::run_migrations;
use taskboard_shared::db::seed::{seed_defaults, AdminAccount};
use taskboard_shared::models::task_filter::TaskFilter;
use taskboard_shared::patch::Patch;
use taskboard_shared::services::label::NewLabel;
use taskboard_shared::services::task::{NewTask, TaskChanges};
use taskboard_shared::services::task_status::{NewTaskStatus, TaskStatusChanges};
use taskboard_shared::services::user::{NewUser, UserChanges};
use taskboard_shared::services::{ServiceError, Services};
use uuid::Uuid;

async fn services() -> Option<(PgPool, Services)> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    seed_defaults(
        &pool,
        &AdminAccount {
            email: format!("admin-{}@example.com", Uuid::new_v4()),
            password: "qwerty".to_string(),
        },
    )
    .await
    .unwrap();

    Some((pool.clone(), Services::new(pool)))
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

fn new_user() -> NewUser {
    NewUser {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        email: format!("{}@example.com", unique("user")),
        password: "cobol".to_string(),
    }
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        index: None,
        content: None,
        assignee_id: None,
        status: "draft".to_string(),
        label_ids: Vec::new(),
    }
}

#[tokio::test]
async fn test_authenticate_checks_password() {
    let Some((_, services)) = services().await else { return };
    let input = new_user();
    let email = input.email.clone();
    let user = services.users.create(input).await.unwrap();

    let authenticated = services.users.authenticate(&email, "cobol").await.unwrap();
    assert_eq!(authenticated.id, user.id);

    let wrong = services.users.authenticate(&email, "fortran").await;
    assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));

    let unknown = services.users.authenticate("nobody@example.com", "cobol").await;
    assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_user_update_rejects_null_email() {
    let Some((_, services)) = services().await else { return };
    let user = services.users.create(new_user()).await.unwrap();

    let result = services
        .users
        .update(
            user.id,
            &user.email,
            UserChanges {
                email: Patch::Null,
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::Validation { field: "email", .. })));
}

#[tokio::test]
async fn test_user_password_change_rehashes() {
    let Some((_, services)) = services().await else { return };
    let user = services.users.create(new_user()).await.unwrap();

    services
        .users
        .update(
            user.id,
            &user.email,
            UserChanges {
                password: Patch::Value("new-secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(services.users.authenticate(&user.email, "new-secret").await.is_ok());
    assert!(services.users.authenticate(&user.email, "cobol").await.is_err());
}

#[tokio::test]
async fn test_missing_user_is_checked_before_ownership_on_update() {
    let Some((_, services)) = services().await else { return };
    let caller = services.users.create(new_user()).await.unwrap();

    let result = services
        .users
        .update(i64::MAX, &caller.email, UserChanges::default())
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_task_update_label_semantics() {
    let Some((_, services)) = services().await else { return };
    let first = services
        .labels
        .create(NewLabel { name: unique("first") })
        .await
        .unwrap();
    let second = services
        .labels
        .create(NewLabel { name: unique("second") })
        .await
        .unwrap();

    let task = services
        .tasks
        .create(NewTask {
            label_ids: vec![second.id, first.id, second.id],
            ..new_task("Labelled")
        })
        .await
        .unwrap();
    assert_eq!(task.label_ids, vec![first.id, second.id]);

    // Absent leaves labels alone
    let renamed = services
        .tasks
        .update(
            task.id,
            TaskChanges {
                title: Patch::Value("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.label_ids, vec![first.id, second.id]);

    let replaced = services
        .tasks
        .update(
            task.id,
            TaskChanges {
                label_ids: Patch::Value(vec![second.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.label_ids, vec![second.id]);
    assert_eq!(replaced.name, "Renamed");

    let cleared = services
        .tasks
        .update(
            task.id,
            TaskChanges {
                label_ids: Patch::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.label_ids.is_empty());

    services.labels.delete(first.id).await.unwrap();
}

#[tokio::test]
async fn test_task_with_missing_label_is_rolled_back() {
    let Some((_, services)) = services().await else { return };
    let title = unique("rollback");

    let result = services
        .tasks
        .create(NewTask {
            label_ids: vec![i64::MAX],
            ..new_task(&title)
        })
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    let leftovers = services
        .tasks
        .list(&TaskFilter::new().with_title_cont(title))
        .await
        .unwrap();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_task_update_rejects_null_title_and_clears_content() {
    let Some((_, services)) = services().await else { return };
    let task = services
        .tasks
        .create(NewTask {
            content: Some("to be removed".to_string()),
            ..new_task("Nullable")
        })
        .await
        .unwrap();

    let null_title = services
        .tasks
        .update(
            task.id,
            TaskChanges {
                title: Patch::Null,
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(null_title, Err(ServiceError::Validation { field: "title", .. })));

    let cleared = services
        .tasks
        .update(
            task.id,
            TaskChanges {
                content: Patch::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.name, "Nullable");
}

#[tokio::test]
async fn test_status_rename_and_guarded_delete() {
    let Some((_, services)) = services().await else { return };
    let status = services
        .task_statuses
        .create(NewTaskStatus {
            name: unique("Review"),
            slug: unique("review"),
        })
        .await
        .unwrap();

    let new_slug = unique("renamed");
    let renamed = services
        .task_statuses
        .update(
            status.id,
            TaskStatusChanges {
                slug: Patch::Value(new_slug.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, new_slug);
    assert_eq!(renamed.name, status.name);

    let task = services
        .tasks
        .create(NewTask {
            status: new_slug.clone(),
            ..new_task("Pinned")
        })
        .await
        .unwrap();
    assert_eq!(task.status_slug, new_slug);

    let guarded = services.task_statuses.delete(status.id).await;
    assert!(matches!(guarded, Err(ServiceError::AssociatedEntityExists(_))));

    services.tasks.delete(task.id).await.unwrap();
    services.task_statuses.delete(status.id).await.unwrap();

    let gone = services.task_statuses.find_by_id(status.id).await;
    assert!(matches!(gone, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_filter_with_wildcards_matches_literally() {
    let Some((_, services)) = services().await else { return };
    let marker = unique("pct");

    services
        .tasks
        .create(new_task(&format!("{marker} 100% done")))
        .await
        .unwrap();
    services
        .tasks
        .create(new_task(&format!("{marker} 100 done")))
        .await
        .unwrap();

    let matches = services
        .tasks
        .list(&TaskFilter::new().with_title_cont(format!("{marker} 100%")))
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert!(matches[0].name.ends_with("100% done"));
}

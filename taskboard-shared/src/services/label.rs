/// Label management

use sqlx::PgPool;
use tracing::info;

use super::error::{ServiceError, ServiceResult};
use crate::models::label::{CreateLabel, Label, UpdateLabel};
use crate::models::task::Task;
use crate::patch::Patch;

#[derive(Debug, Clone)]
pub struct NewLabel {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct LabelChanges {
    pub name: Patch<String>,
}

#[derive(Debug, Clone)]
pub struct LabelService {
    pool: PgPool,
}

impl LabelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Label>> {
        Ok(Label::list(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Label> {
        Label::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Label", id))
    }

    pub async fn create(&self, input: NewLabel) -> ServiceResult<Label> {
        let label = Label::create(&self.pool, CreateLabel { name: input.name }).await?;

        info!(label_id = label.id, "Label created");
        Ok(label)
    }

    pub async fn update(&self, id: i64, changes: LabelChanges) -> ServiceResult<Label> {
        let update = UpdateLabel {
            name: changes.name.into_required("name")?,
        };

        let label = Label::update(&self.pool, id, update)
            .await?
            .ok_or_else(|| ServiceError::not_found("Label", id))?;

        info!(label_id = label.id, "Label updated");
        Ok(label)
    }

    /// Deletes a label unless some task still carries it
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        if Label::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(ServiceError::not_found("Label", id));
        }

        if Task::exists_with_label(&mut *tx, id).await? {
            return Err(ServiceError::AssociatedEntityExists(
                "Label is attached to one or more tasks".to_string(),
            ));
        }

        Label::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(label_id = id, "Label deleted");
        Ok(())
    }
}

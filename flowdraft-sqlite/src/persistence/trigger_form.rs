use flowdraft_storage::entities::trigger_form::StoredTriggerForm;
use flowdraft_storage::error::StorageError;
use sqlx::SqlitePool;

use crate::{crud::trigger_form_crud, models::trigger_form::TriggerForm};

#[derive(Clone)]
pub struct TriggerFormPersistence {
    pool: SqlitePool,
}

impl TriggerFormPersistence {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn to_entity(model: TriggerForm) -> Result<StoredTriggerForm, StorageError> {
        let form = serde_json::from_str(&model.form)
            .map_err(|e| StorageError::DeserializationError(format!("trigger form of {}: {}", model.template_id, e)))?;
        Ok(StoredTriggerForm {
            template_id: model.template_id,
            form,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_model(entity: &StoredTriggerForm) -> Result<TriggerForm, StorageError> {
        Ok(TriggerForm {
            template_id: entity.template_id.clone(),
            form: serde_json::to_string(&entity.form).map_err(|e| StorageError::SerializationError(e.to_string()))?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    pub async fn upsert_trigger_form(&self, form: &StoredTriggerForm) -> Result<(), StorageError> {
        let model = Self::to_model(form)?;
        trigger_form_crud::upsert_trigger_form(&self.pool, &model).await?;
        Ok(())
    }

    pub async fn get_trigger_form(&self, template_id: &str) -> Result<Option<StoredTriggerForm>, StorageError> {
        let model = trigger_form_crud::get_trigger_form(&self.pool, template_id).await?;
        model.map(Self::to_entity).transpose()
    }

    pub async fn find_trigger_forms(&self) -> Result<Vec<StoredTriggerForm>, StorageError> {
        let models = trigger_form_crud::find_trigger_forms(&self.pool).await?;
        models.into_iter().map(Self::to_entity).collect()
    }

    pub async fn delete_trigger_form(&self, template_id: &str) -> Result<(), StorageError> {
        trigger_form_crud::delete_trigger_form(&self.pool, template_id).await?;
        Ok(())
    }
}

use flowdraft_storage::entities::template_metadata::{StoredMetadata, UpdateStoredMetadata};
use flowdraft_storage::error::StorageError;
use sqlx::SqlitePool;

use crate::{
    crud::template_metadata_crud,
    models::template_metadata::{TemplateMetadata, UpdateTemplateMetadata},
};

#[derive(Clone)]
pub struct TemplateMetadataPersistence {
    pool: SqlitePool,
}

impl TemplateMetadataPersistence {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // model -> entity
    fn to_entity(model: TemplateMetadata) -> Result<StoredMetadata, StorageError> {
        let tags = serde_json::from_str(&model.tags)
            .map_err(|e| StorageError::DeserializationError(format!("tags of {}: {}", model.template_id, e)))?;
        Ok(StoredMetadata {
            template_id: model.template_id,
            title: model.title,
            tags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    // entity -> model
    fn to_model(entity: &StoredMetadata) -> Result<TemplateMetadata, StorageError> {
        Ok(TemplateMetadata {
            template_id: entity.template_id.clone(),
            title: entity.title.clone(),
            tags: serde_json::to_string(&entity.tags).map_err(|e| StorageError::SerializationError(e.to_string()))?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    // entity update -> model update
    fn to_model_update(entity: &UpdateStoredMetadata) -> Result<UpdateTemplateMetadata, StorageError> {
        let tags = entity
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(UpdateTemplateMetadata {
            title: entity.title.clone(),
            tags,
        })
    }

    pub async fn create_metadata(&self, metadata: &StoredMetadata) -> Result<(), StorageError> {
        let model = Self::to_model(metadata)?;
        template_metadata_crud::create_metadata(&self.pool, &model).await?;
        Ok(())
    }

    pub async fn get_metadata(&self, template_id: &str) -> Result<Option<StoredMetadata>, StorageError> {
        let model = template_metadata_crud::get_metadata(&self.pool, template_id).await?;
        model.map(Self::to_entity).transpose()
    }

    pub async fn update_metadata(
        &self,
        template_id: &str,
        changes: &UpdateStoredMetadata,
    ) -> Result<Option<StoredMetadata>, StorageError> {
        let model_update = Self::to_model_update(changes)?;
        template_metadata_crud::update_metadata(&self.pool, template_id, &model_update).await?;
        self.get_metadata(template_id).await
    }

    pub async fn delete_metadata(&self, template_id: &str) -> Result<(), StorageError> {
        template_metadata_crud::delete_metadata(&self.pool, template_id).await?;
        Ok(())
    }
}

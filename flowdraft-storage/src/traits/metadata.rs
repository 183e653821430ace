use crate::entities::template_metadata::{StoredMetadata, UpdateStoredMetadata};
use crate::error::StorageError;

#[async_trait::async_trait]
pub trait MetadataStorage: Send + Sync {
    /// Create metadata for a template; fails if it already exists
    async fn create_metadata(&self, metadata: &StoredMetadata) -> Result<(), StorageError>;

    /// Get metadata by template_id
    async fn get_metadata(&self, template_id: &str) -> Result<Option<StoredMetadata>, StorageError>;

    /// Partially update metadata, returning the updated row
    async fn update_metadata(
        &self,
        template_id: &str,
        changes: &UpdateStoredMetadata,
    ) -> Result<Option<StoredMetadata>, StorageError>;

    /// Delete metadata
    async fn delete_metadata(&self, template_id: &str) -> Result<(), StorageError>;
}

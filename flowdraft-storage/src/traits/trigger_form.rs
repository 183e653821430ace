use crate::entities::trigger_form::StoredTriggerForm;
use crate::error::StorageError;

#[async_trait::async_trait]
pub trait TriggerFormStorage: Send + Sync {
    /// Insert or replace the trigger form of a template
    async fn upsert_trigger_form(&self, form: &StoredTriggerForm) -> Result<(), StorageError>;

    /// Get a trigger form by template_id
    async fn get_trigger_form(&self, template_id: &str) -> Result<Option<StoredTriggerForm>, StorageError>;

    /// All trigger forms
    async fn find_trigger_forms(&self) -> Result<Vec<StoredTriggerForm>, StorageError>;

    /// Delete a trigger form
    async fn delete_trigger_form(&self, template_id: &str) -> Result<(), StorageError>;
}

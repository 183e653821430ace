use sqlx::SqlitePool;
use flowdraft_storage::{
    error::StorageError,
    entities::{
        task_body::StoredTaskBody,
        template_metadata::{StoredMetadata, UpdateStoredMetadata},
        trigger_form::StoredTriggerForm,
        workflow_template::StoredTemplateHeader,
    },
};
use crate::persistence::{
    task_body::TaskBodyPersistence,
    template_metadata::TemplateMetadataPersistence,
    trigger_form::TriggerFormPersistence,
    workflow_template::WorkflowTemplatePersistence,
};

/// SQLite-backed implementation of every template collection.
#[derive(Clone)]
pub struct SqliteStorageManager {
    pool: SqlitePool,
    workflow_template: WorkflowTemplatePersistence,
    task_body: TaskBodyPersistence,
    template_metadata: TemplateMetadataPersistence,
    trigger_form: TriggerFormPersistence,
}

impl SqliteStorageManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            workflow_template: WorkflowTemplatePersistence::new(pool.clone()),
            task_body: TaskBodyPersistence::new(pool.clone()),
            template_metadata: TemplateMetadataPersistence::new(pool.clone()),
            trigger_form: TriggerFormPersistence::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl flowdraft_storage::traits::TemplateStorage for SqliteStorageManager {
    async fn insert_draft(&self, header: &StoredTemplateHeader) -> Result<Option<i64>, StorageError> {
        self.workflow_template.insert_draft(header).await
    }

    async fn last_version(&self, template_id: &str) -> Result<i64, StorageError> {
        self.workflow_template.last_version(template_id).await
    }

    async fn reserve_version(&self, template_id: &str) -> Result<i64, StorageError> {
        self.workflow_template.reserve_version(template_id).await
    }

    async fn get_one(
        &self,
        template_id: &str,
        draft: bool,
        version: Option<i64>,
    ) -> Result<Option<StoredTemplateHeader>, StorageError> {
        self.workflow_template.get_one(template_id, draft, version).await
    }

    async fn find_templates(&self, template_id: Option<&str>) -> Result<Vec<StoredTemplateHeader>, StorageError> {
        self.workflow_template.find_templates(template_id).await
    }

    async fn find_for_topic(&self, topic: &str) -> Result<Vec<StoredTemplateHeader>, StorageError> {
        self.workflow_template.find_for_topic(topic).await
    }

    async fn publish(&self, template_id: &str) -> Result<StoredTemplateHeader, StorageError> {
        self.workflow_template.publish(template_id).await
    }

    async fn delete_templates(&self, template_id: &str, draft: bool) -> Result<Vec<i64>, StorageError> {
        self.workflow_template.delete_templates(template_id, draft).await
    }

    async fn find_template_ids(&self) -> Result<Vec<String>, StorageError> {
        self.workflow_template.find_template_ids().await
    }

    async fn reconcile(&self, template_id: &str) -> Result<u64, StorageError> {
        self.workflow_template.reconcile(template_id).await
    }
}

#[async_trait::async_trait]
impl flowdraft_storage::traits::TaskBodyStorage for SqliteStorageManager {
    async fn replace_task_bodies(
        &self,
        template_id: &str,
        version: i64,
        bodies: &[StoredTaskBody],
    ) -> Result<(), StorageError> {
        self.task_body.replace_task_bodies(template_id, version, bodies).await
    }

    async fn find_task_bodies(&self, template_id: &str, version: i64) -> Result<Vec<StoredTaskBody>, StorageError> {
        self.task_body.find_task_bodies(template_id, version).await
    }

    async fn delete_task_bodies(&self, template_id: &str, version: Option<i64>) -> Result<u64, StorageError> {
        self.task_body.delete_task_bodies(template_id, version).await
    }
}

#[async_trait::async_trait]
impl flowdraft_storage::traits::MetadataStorage for SqliteStorageManager {
    async fn create_metadata(&self, metadata: &StoredMetadata) -> Result<(), StorageError> {
        self.template_metadata.create_metadata(metadata).await
    }

    async fn get_metadata(&self, template_id: &str) -> Result<Option<StoredMetadata>, StorageError> {
        self.template_metadata.get_metadata(template_id).await
    }

    async fn update_metadata(
        &self,
        template_id: &str,
        changes: &UpdateStoredMetadata,
    ) -> Result<Option<StoredMetadata>, StorageError> {
        self.template_metadata.update_metadata(template_id, changes).await
    }

    async fn delete_metadata(&self, template_id: &str) -> Result<(), StorageError> {
        self.template_metadata.delete_metadata(template_id).await
    }
}

#[async_trait::async_trait]
impl flowdraft_storage::traits::TriggerFormStorage for SqliteStorageManager {
    async fn upsert_trigger_form(&self, form: &StoredTriggerForm) -> Result<(), StorageError> {
        self.trigger_form.upsert_trigger_form(form).await
    }

    async fn get_trigger_form(&self, template_id: &str) -> Result<Option<StoredTriggerForm>, StorageError> {
        self.trigger_form.get_trigger_form(template_id).await
    }

    async fn find_trigger_forms(&self) -> Result<Vec<StoredTriggerForm>, StorageError> {
        self.trigger_form.find_trigger_forms().await
    }

    async fn delete_trigger_form(&self, template_id: &str) -> Result<(), StorageError> {
        self.trigger_form.delete_trigger_form(template_id).await
    }
}

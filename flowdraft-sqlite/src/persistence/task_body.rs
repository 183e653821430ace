use flowdraft_storage::entities::task_body::StoredTaskBody;
use flowdraft_storage::error::StorageError;
use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    crud::{task_body_crud, workflow_template_crud},
    models::task_body::TaskBody,
};

#[derive(Clone)]
pub struct TaskBodyPersistence {
    pool: SqlitePool,
}

impl TaskBodyPersistence {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn to_entity(model: TaskBody) -> Result<StoredTaskBody, StorageError> {
        let config = serde_json::from_str(&model.config).map_err(|e| {
            StorageError::DeserializationError(format!(
                "config of task {} ({}@{}): {}",
                model.task_id, model.template_id, model.version, e
            ))
        })?;
        Ok(StoredTaskBody {
            template_id: model.template_id,
            version: model.version,
            task_id: model.task_id,
            name: model.name,
            config,
            position: model.position,
        })
    }

    fn to_model(entity: &StoredTaskBody) -> Result<TaskBody, StorageError> {
        Ok(TaskBody {
            template_id: entity.template_id.clone(),
            version: entity.version,
            task_id: entity.task_id.clone(),
            name: entity.name.clone(),
            config: serde_json::to_string(&entity.config)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?,
            position: entity.position,
        })
    }

    /// Swap the whole body set of one version; rows left out of `bodies` are dropped.
    pub async fn replace_task_bodies(
        &self,
        template_id: &str,
        version: i64,
        bodies: &[StoredTaskBody],
    ) -> Result<(), StorageError> {
        if let Some(stray) = bodies.iter().find(|b| b.template_id != template_id || b.version != version) {
            return Err(StorageError::InvalidData(format!(
                "task {} belongs to {}@{}, not {}@{}",
                stray.task_id, stray.template_id, stray.version, template_id, version
            )));
        }
        let models = bodies.iter().map(Self::to_model).collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.pool.begin().await?;
        // 表头写入后任务体即冻结
        if workflow_template_crud::get_template_by_version(&mut *tx, template_id, version)
            .await?
            .is_some()
        {
            return Err(StorageError::ConcurrentModification(format!(
                "{}@{} already has a header",
                template_id, version
            )));
        }
        let removed = task_body_crud::delete_task_bodies(&mut *tx, template_id, Some(version)).await?;
        for model in &models {
            task_body_crud::upsert_task_body(&mut *tx, model).await?;
        }
        tx.commit().await?;

        debug!(template_id, version, removed, written = models.len(), "task bodies replaced");
        Ok(())
    }

    pub async fn find_task_bodies(&self, template_id: &str, version: i64) -> Result<Vec<StoredTaskBody>, StorageError> {
        let models = task_body_crud::find_task_bodies(&self.pool, template_id, version).await?;
        models.into_iter().map(Self::to_entity).collect()
    }

    pub async fn delete_task_bodies(&self, template_id: &str, version: Option<i64>) -> Result<u64, StorageError> {
        let deleted = task_body_crud::delete_task_bodies(&self.pool, template_id, version).await?;
        Ok(deleted)
    }
}

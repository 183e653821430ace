use chrono::Utc;
use flowdraft_dto::{SchemaMarker, TemplateState};
use flowdraft_storage::entities::workflow_template::StoredTemplateHeader;
use flowdraft_storage::error::StorageError;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::{
    crud::{task_body_crud, workflow_template_crud},
    models::workflow_template::WorkflowTemplate,
};

#[derive(Clone)]
pub struct WorkflowTemplatePersistence {
    pool: SqlitePool,
}

impl WorkflowTemplatePersistence {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // model -> entity
    fn to_entity(model: WorkflowTemplate) -> Result<StoredTemplateHeader, StorageError> {
        let state = model
            .state
            .parse::<TemplateState>()
            .map_err(StorageError::DeserializationError)?;
        let graph = serde_json::from_str(&model.graph).map_err(|e| {
            StorageError::DeserializationError(format!("graph of {}@{}: {}", model.template_id, model.version, e))
        })?;
        let topics = serde_json::from_str(&model.topics).map_err(|e| {
            StorageError::DeserializationError(format!("topics of {}@{}: {}", model.template_id, model.version, e))
        })?;
        let schema_marker = model
            .schema_marker
            .as_deref()
            .map(SchemaMarker::from_column)
            .transpose()
            .map_err(|e| StorageError::DeserializationError(format!("schema marker: {}", e)))?;

        Ok(StoredTemplateHeader {
            template_id: model.template_id,
            version: model.version,
            state,
            graph,
            topics,
            policy: model.policy,
            schema_marker,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    // entity -> model
    fn to_model(entity: &StoredTemplateHeader) -> Result<WorkflowTemplate, StorageError> {
        Ok(WorkflowTemplate {
            template_id: entity.template_id.clone(),
            version: entity.version,
            state: entity.state.as_str().to_string(),
            graph: serde_json::to_string(&entity.graph)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?,
            topics: serde_json::to_string(&entity.topics)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?,
            policy: entity.policy.clone(),
            schema_marker: entity.schema_marker.as_ref().map(SchemaMarker::to_column),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    fn to_entities(models: Vec<WorkflowTemplate>) -> Result<Vec<StoredTemplateHeader>, StorageError> {
        models.into_iter().map(Self::to_entity).collect()
    }

    pub async fn insert_draft(&self, header: &StoredTemplateHeader) -> Result<Option<i64>, StorageError> {
        if header.state != TemplateState::Draft {
            return Err(StorageError::InvalidData(format!(
                "insert_draft expects a draft header, got '{}'",
                header.state
            )));
        }
        let model = Self::to_model(header)?;
        let id = header.template_id.as_str();

        // 版本检查、替换草稿、推进计数器在同一事务内完成
        let mut tx = self.pool.begin().await?;
        let counter = workflow_template_crud::get_version_counter(&mut *tx, id).await?;
        let max_stored = workflow_template_crud::max_stored_version(&mut *tx, id).await?.unwrap_or(0);
        let last = counter.unwrap_or(0).max(max_stored);
        // 要么是最新一次预留且还没有表头，要么是尚未分配的下一个版本
        let reserved = counter == Some(header.version) && max_stored < header.version;
        if !reserved && header.version != last + 1 {
            return Err(StorageError::VersionConflict {
                template_id: id.to_string(),
                expected: last + 1,
                actual: header.version,
            });
        }
        let draft = Some(TemplateState::Draft.as_str());
        let replaced = workflow_template_crud::find_versions(&mut *tx, id, draft).await?.into_iter().next();
        workflow_template_crud::delete_templates(&mut *tx, id, draft).await?;
        workflow_template_crud::insert_template(&mut *tx, &model).await?;
        workflow_template_crud::bump_version_counter(&mut *tx, id, header.version).await?;
        tx.commit().await?;

        debug!(template_id = %id, version = header.version, ?replaced, "draft row written");
        Ok(replaced)
    }

    pub async fn last_version(&self, template_id: &str) -> Result<i64, StorageError> {
        let last = workflow_template_crud::last_version(&self.pool, template_id).await?;
        Ok(last)
    }

    pub async fn reserve_version(&self, template_id: &str) -> Result<i64, StorageError> {
        let version = workflow_template_crud::reserve_version(&self.pool, template_id).await?;
        debug!(template_id, version, "version reserved");
        Ok(version)
    }

    pub async fn get_one(
        &self,
        template_id: &str,
        draft: bool,
        version: Option<i64>,
    ) -> Result<Option<StoredTemplateHeader>, StorageError> {
        let model = match version {
            Some(version) => workflow_template_crud::get_template_by_version(&self.pool, template_id, version).await?,
            None => {
                let state = if draft { TemplateState::Draft } else { TemplateState::Active };
                workflow_template_crud::get_template_by_state(&self.pool, template_id, state.as_str()).await?
            }
        };
        model.map(Self::to_entity).transpose()
    }

    pub async fn find_templates(&self, template_id: Option<&str>) -> Result<Vec<StoredTemplateHeader>, StorageError> {
        let models = workflow_template_crud::find_current_templates(&self.pool, template_id).await?;
        Self::to_entities(models)
    }

    pub async fn find_for_topic(&self, topic: &str) -> Result<Vec<StoredTemplateHeader>, StorageError> {
        let models = workflow_template_crud::find_active_for_topic(&self.pool, topic).await?;
        Self::to_entities(models)
    }

    pub async fn find_template_ids(&self) -> Result<Vec<String>, StorageError> {
        let ids = workflow_template_crud::find_template_ids(&self.pool).await?;
        Ok(ids)
    }

    /// Archive, then promote, inside one transaction: readers never see zero or two active rows.
    pub async fn publish(&self, template_id: &str) -> Result<StoredTemplateHeader, StorageError> {
        let mut tx = self.pool.begin().await?;
        let draft = workflow_template_crud::get_template_by_state(&mut *tx, template_id, TemplateState::Draft.as_str())
            .await?
            .ok_or_else(|| StorageError::NoDraft(template_id.to_string()))?;

        let now = Utc::now().naive_utc();
        let archived = workflow_template_crud::update_state(
            &mut *tx,
            template_id,
            TemplateState::Active.as_str(),
            TemplateState::Archived.as_str(),
            now,
        )
        .await?;
        workflow_template_crud::update_version_state(
            &mut *tx,
            template_id,
            draft.version,
            TemplateState::Active.as_str(),
            now,
        )
        .await?;
        let published = workflow_template_crud::get_template_by_version(&mut *tx, template_id, draft.version)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("{}@{}", template_id, draft.version)))?;
        tx.commit().await?;

        debug!(template_id, version = draft.version, archived, "draft promoted");
        Self::to_entity(published)
    }

    pub async fn delete_templates(&self, template_id: &str, draft: bool) -> Result<Vec<i64>, StorageError> {
        let state = draft.then(|| TemplateState::Draft.as_str());

        let mut tx = self.pool.begin().await?;
        let versions = workflow_template_crud::find_versions(&mut *tx, template_id, state).await?;
        workflow_template_crud::delete_templates(&mut *tx, template_id, state).await?;
        tx.commit().await?;

        Ok(versions)
    }

    pub async fn reconcile(&self, template_id: &str) -> Result<u64, StorageError> {
        let mut tx = self.pool.begin().await?;
        let mut fixed = 0u64;

        // 最高版本的 active 胜出，其余归档
        let actives = workflow_template_crud::find_templates_by_state(
            &mut *tx,
            template_id,
            TemplateState::Active.as_str(),
        )
        .await?;
        if actives.len() > 1 {
            let now = Utc::now().naive_utc();
            for stale in actives.iter().skip(1) {
                fixed += workflow_template_crud::update_version_state(
                    &mut *tx,
                    template_id,
                    stale.version,
                    TemplateState::Archived.as_str(),
                    now,
                )
                .await?;
            }
            warn!(template_id, kept = actives[0].version, archived = fixed, "duplicate active rows archived");
        }

        let max_stored = workflow_template_crud::max_stored_version(&mut *tx, template_id).await?;
        let counter = workflow_template_crud::get_version_counter(&mut *tx, template_id).await?;
        if let Some(max_stored) = max_stored {
            if counter.map_or(true, |c| c < max_stored) {
                workflow_template_crud::bump_version_counter(&mut *tx, template_id, max_stored).await?;
                warn!(template_id, ?counter, max_stored, "version counter repaired");
                fixed += 1;
            }
        }

        // 低于最新预留、又没有表头的任务体来自中断或被拒绝的 create_draft
        let newest = counter.unwrap_or(0).max(max_stored.unwrap_or(0));
        let orphans = task_body_crud::delete_orphan_task_bodies(&mut *tx, template_id, newest).await?;
        if orphans > 0 {
            warn!(template_id, orphans, below = newest, "orphaned task bodies removed");
            fixed += orphans;
        }

        tx.commit().await?;
        Ok(fixed)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use flowdraft_dto::{
    DraftSpec, MetadataUpdate, TaskDocument, TemplateDocument, TemplateMetadataDto, TemplateState, TriggerFormDto,
};
use flowdraft_migrate::MigrationEngine;
use flowdraft_storage::db::DynPM;
use flowdraft_storage::entities::{
    StoredMetadata, StoredTaskBody, StoredTemplateHeader, StoredTriggerForm, UpdateStoredMetadata,
};
use flowdraft_storage::error::StorageError;
use flowdraft_storage::traits::*;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::inspect;
use crate::service::{TemplateService, TriggerFormService};
use crate::validation::validate_draft;

/// Keeps headers, task bodies, metadata and trigger forms consistent.
///
/// The collections have no shared transaction, so writes are ordered:
/// task bodies before the header on create, the header before its
/// dependents on delete. Retrying an interrupted call converges.
#[derive(Clone)]
pub struct LifecycleCoordinator {
    pm: DynPM,
    engine: Arc<MigrationEngine>,
}

impl LifecycleCoordinator {
    pub fn new(pm: DynPM, engine: Arc<MigrationEngine>) -> Self {
        Self { pm, engine }
    }

    pub fn engine(&self) -> &MigrationEngine {
        &self.engine
    }

    /// Same as [`TemplateService::templates_for_topic`].
    pub async fn get_for_topic(&self, topic: &str) -> AppResult<Vec<TemplateDocument>> {
        self.templates_for_topic(topic).await
    }

    fn migrate(&self, doc: TemplateDocument) -> AppResult<TemplateDocument> {
        self.engine.upgrade(&doc).map_err(|e| {
            error!(template_id = %doc.id, version = doc.version, error = %e, "template could not be migrated");
            AppError::Migration(e)
        })
    }

    fn merge(
        header: StoredTemplateHeader,
        metadata: Option<&StoredMetadata>,
        bodies: Option<Vec<StoredTaskBody>>,
    ) -> TemplateDocument {
        TemplateDocument {
            id: header.template_id,
            version: header.version,
            state: header.state,
            title: metadata.map(|m| m.title.clone()),
            tags: metadata.map(|m| m.tags.clone()).unwrap_or_default(),
            policy: header.policy,
            topics: header.topics,
            graph: header.graph,
            tasks: bodies.map(|bodies| {
                bodies
                    .into_iter()
                    .map(|b| TaskDocument {
                        id: b.task_id,
                        name: b.name,
                        config: b.config,
                    })
                    .collect()
            }),
            schema_marker: header.schema_marker,
            updated_at: Some(header.updated_at),
        }
    }

    async fn load(
        &self,
        header: StoredTemplateHeader,
        metadata: Option<&StoredMetadata>,
        with_tasks: bool,
    ) -> AppResult<TemplateDocument> {
        let bodies = if with_tasks {
            Some(self.pm.find_task_bodies(&header.template_id, header.version).await?)
        } else {
            None
        };
        self.migrate(Self::merge(header, metadata, bodies))
    }

    async fn sync_metadata(&self, template_id: &str, title: &str, tags: &[String]) -> AppResult<()> {
        let now = Utc::now().naive_utc();
        match self.pm.get_metadata(template_id).await? {
            None => {
                self.pm
                    .create_metadata(&StoredMetadata {
                        template_id: template_id.to_string(),
                        title: title.to_string(),
                        tags: tags.to_vec(),
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
            }
            Some(existing) if existing.title != title || existing.tags != tags => {
                let changes = UpdateStoredMetadata {
                    title: Some(title.to_string()),
                    tags: Some(tags.to_vec()),
                };
                self.pm.update_metadata(template_id, &changes).await?;
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn form_dto(form: StoredTriggerForm) -> TriggerFormDto {
        TriggerFormDto {
            template_id: form.template_id,
            form: form.form,
            updated_at: Some(form.updated_at),
        }
    }
}

#[async_trait]
impl TemplateService for LifecycleCoordinator {
    async fn create_draft(&self, spec: DraftSpec) -> AppResult<TemplateDocument> {
        let valid = validate_draft(&spec)?;
        let template_id = spec.id.clone().unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let now = Utc::now().naive_utc();

        // 按旧 schema 编写的任务先升级，未标注的视为当前 schema
        let authored = TemplateDocument {
            id: template_id.clone(),
            version: 0,
            state: TemplateState::Draft,
            title: Some(valid.title.to_string()),
            tags: spec.tags.clone(),
            policy: spec.policy.clone(),
            topics: spec.topics.clone(),
            graph: valid.graph.clone(),
            tasks: Some(valid.tasks.to_vec()),
            schema_marker: Some(spec.schema_marker.clone().unwrap_or_else(|| self.engine.current().clone())),
            updated_at: Some(now),
        };
        // 请求体里的旧任务格式不对属于输入错误
        let mut doc = self
            .engine
            .upgrade(&authored)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if doc.schema_marker.as_ref() != Some(self.engine.current()) {
            return Err(AppError::Validation(format!(
                "unknown schema marker '{}'",
                spec.schema_marker.as_ref().map(ToString::to_string).unwrap_or_default()
            )));
        }

        // 预留的版本号只属于本次调用，任务体不会和其他写入者混在一起
        let version = self.pm.reserve_version(&template_id).await?;

        let bodies: Vec<StoredTaskBody> = doc
            .tasks
            .iter()
            .flatten()
            .enumerate()
            .map(|(pos, task)| StoredTaskBody {
                template_id: template_id.clone(),
                version,
                task_id: task.id.clone(),
                name: task.name.clone(),
                config: task.config.clone(),
                position: pos as i64,
            })
            .collect();
        self.pm.replace_task_bodies(&template_id, version, &bodies).await?;

        let header = StoredTemplateHeader {
            template_id: template_id.clone(),
            version,
            state: TemplateState::Draft,
            graph: doc.graph.clone(),
            topics: doc.topics.clone(),
            policy: doc.policy.clone(),
            schema_marker: doc.schema_marker.clone(),
            created_at: now,
            updated_at: now,
        };
        let replaced = match self.pm.insert_draft(&header).await {
            Ok(replaced) => replaced,
            Err(err) => {
                // 明确被拒绝时才清理；存储不可用时结果未知，留给 reconcile
                if matches!(err, StorageError::VersionConflict { .. } | StorageError::ConcurrentModification(_)) {
                    if let Err(cleanup) = self.pm.delete_task_bodies(&template_id, Some(version)).await {
                        warn!(template_id = %template_id, version, error = %cleanup, "bodies of rejected draft left behind");
                    }
                }
                return Err(err.into());
            }
        };

        if let Some(old) = replaced.filter(|old| *old != version) {
            let removed = self.pm.delete_task_bodies(&template_id, Some(old)).await?;
            debug!(template_id = %template_id, version = old, removed, "replaced draft bodies removed");
        }

        self.sync_metadata(&template_id, valid.title, &spec.tags).await?;

        info!(template_id = %template_id, version, "draft created");
        doc.version = version;
        Ok(doc)
    }

    async fn list_templates(&self, template_id: Option<&str>, full: bool) -> AppResult<Vec<TemplateDocument>> {
        let headers = self.pm.find_templates(template_id).await?;

        let mut metadata: HashMap<String, Option<StoredMetadata>> = HashMap::new();
        let mut docs = Vec::with_capacity(headers.len());
        for header in headers {
            if !metadata.contains_key(&header.template_id) {
                let meta = self.pm.get_metadata(&header.template_id).await?;
                metadata.insert(header.template_id.clone(), meta);
            }
            let meta = metadata.get(&header.template_id).and_then(Option::as_ref);
            docs.push(self.load(header, meta, full).await?);
        }
        Ok(docs)
    }

    async fn get_template(
        &self,
        template_id: &str,
        version: Option<i64>,
        draft: bool,
    ) -> AppResult<Option<TemplateDocument>> {
        let Some(header) = self.pm.get_one(template_id, draft, version).await? else {
            return Ok(None);
        };
        let metadata = self.pm.get_metadata(template_id).await?;
        let doc = self.load(header, metadata.as_ref(), true).await?;
        Ok(Some(doc))
    }

    async fn publish_draft(&self, template_id: &str) -> AppResult<()> {
        let published = self.pm.publish(template_id).await?;
        info!(template_id = %template_id, version = published.version, "draft published");
        Ok(())
    }

    async fn delete_template(&self, template_id: &str, draft: bool) -> AppResult<()> {
        let versions = self.pm.delete_templates(template_id, draft).await?;
        if draft {
            for version in &versions {
                self.pm.delete_task_bodies(template_id, Some(*version)).await?;
            }
        } else {
            self.pm.delete_task_bodies(template_id, None).await?;
            self.pm.delete_metadata(template_id).await?;
            self.pm.delete_trigger_form(template_id).await?;
        }
        info!(template_id = %template_id, draft, ?versions, "template deleted");
        Ok(())
    }

    async fn templates_for_topic(&self, topic: &str) -> AppResult<Vec<TemplateDocument>> {
        let headers = self.pm.find_for_topic(topic).await?;
        let mut docs = Vec::with_capacity(headers.len());
        for header in headers {
            docs.push(self.load(header, None, true).await?);
        }
        Ok(docs)
    }

    async fn update_metadata(&self, template_id: &str, update: MetadataUpdate) -> AppResult<TemplateMetadataDto> {
        let changes = UpdateStoredMetadata {
            title: update.title,
            tags: update.tags,
        };
        let updated = self
            .pm
            .update_metadata(template_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("template '{}'", template_id)))?;
        Ok(TemplateMetadataDto {
            template_id: updated.template_id,
            title: updated.title,
            tags: updated.tags,
            updated_at: updated.updated_at,
        })
    }

    async fn required_keys(&self, template_id: &str, version: Option<i64>, draft: bool) -> AppResult<Vec<String>> {
        let doc = self
            .get_template(template_id, version, draft)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("template '{}'", template_id)))?;
        Ok(inspect::required_keys(doc.tasks.as_deref().unwrap_or_default()))
    }

    async fn reconcile_all(&self) -> AppResult<u64> {
        let mut fixed = 0;
        for template_id in self.pm.find_template_ids().await? {
            fixed += self.pm.reconcile(&template_id).await?;
        }
        info!(fixed, "reconcile finished");
        Ok(fixed)
    }
}

#[async_trait]
impl TriggerFormService for LifecycleCoordinator {
    async fn get_trigger_form(&self, template_id: &str) -> AppResult<Option<TriggerFormDto>> {
        let form = self.pm.get_trigger_form(template_id).await?;
        Ok(form.map(Self::form_dto))
    }

    async fn list_trigger_forms(&self) -> AppResult<Vec<TriggerFormDto>> {
        let forms = self.pm.find_trigger_forms().await?;
        Ok(forms.into_iter().map(Self::form_dto).collect())
    }

    async fn set_trigger_form(&self, template_id: &str, form: Value) -> AppResult<TriggerFormDto> {
        if self.pm.get_metadata(template_id).await?.is_none() {
            return Err(AppError::NotFound(format!("template '{}'", template_id)));
        }
        let now = Utc::now().naive_utc();
        self.pm
            .upsert_trigger_form(&StoredTriggerForm {
                template_id: template_id.to_string(),
                form,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let stored = self
            .pm
            .get_trigger_form(template_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("trigger form of '{}' vanished after upsert", template_id)))?;
        debug!(template_id = %template_id, "trigger form saved");
        Ok(Self::form_dto(stored))
    }

    async fn delete_trigger_form(&self, template_id: &str) -> AppResult<()> {
        self.pm.delete_trigger_form(template_id).await?;
        Ok(())
    }
}

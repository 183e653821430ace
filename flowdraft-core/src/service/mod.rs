pub mod lifecycle;

use async_trait::async_trait;
use flowdraft_dto::{DraftSpec, MetadataUpdate, TemplateDocument, TemplateMetadataDto, TriggerFormDto};
use serde_json::Value;

use crate::error::AppResult;

pub use lifecycle::LifecycleCoordinator;

#[async_trait]
pub trait TemplateService: Clone + Send + Sync + 'static {
    async fn create_draft(&self, spec: DraftSpec) -> AppResult<TemplateDocument>;
    async fn list_templates(&self, template_id: Option<&str>, full: bool) -> AppResult<Vec<TemplateDocument>>;
    async fn get_template(
        &self,
        template_id: &str,
        version: Option<i64>,
        draft: bool,
    ) -> AppResult<Option<TemplateDocument>>;
    async fn publish_draft(&self, template_id: &str) -> AppResult<()>;
    async fn delete_template(&self, template_id: &str, draft: bool) -> AppResult<()>;
    async fn templates_for_topic(&self, topic: &str) -> AppResult<Vec<TemplateDocument>>;
    async fn update_metadata(&self, template_id: &str, update: MetadataUpdate) -> AppResult<TemplateMetadataDto>;
    async fn required_keys(&self, template_id: &str, version: Option<i64>, draft: bool) -> AppResult<Vec<String>>;
    async fn reconcile_all(&self) -> AppResult<u64>;
}

#[async_trait]
pub trait TriggerFormService: Clone + Send + Sync + 'static {
    async fn get_trigger_form(&self, template_id: &str) -> AppResult<Option<TriggerFormDto>>;
    async fn list_trigger_forms(&self) -> AppResult<Vec<TriggerFormDto>>;
    async fn set_trigger_form(&self, template_id: &str, form: Value) -> AppResult<TriggerFormDto>;
    async fn delete_trigger_form(&self, template_id: &str) -> AppResult<()>;
}

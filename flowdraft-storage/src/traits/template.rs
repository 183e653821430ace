use crate::entities::workflow_template::StoredTemplateHeader;
use crate::error::StorageError;

#[async_trait::async_trait]
pub trait TemplateStorage: Send + Sync {
    /// Replace the draft row of `header.template_id` with `header`.
    ///
    /// `header.version` must be the newest reservation from
    /// [`reserve_version`](Self::reserve_version) or `last_version + 1`;
    /// anything else fails with [`StorageError::VersionConflict`].
    /// Returns the version of the draft it replaced, if any.
    async fn insert_draft(&self, header: &StoredTemplateHeader) -> Result<Option<i64>, StorageError>;

    /// Atomically assign `last_version + 1` to the caller. A reserved number is
    /// never handed out again, even if no header is ever written for it.
    async fn reserve_version(&self, template_id: &str) -> Result<i64, StorageError>;

    /// Highest version ever assigned to the template, 0 if none
    async fn last_version(&self, template_id: &str) -> Result<i64, StorageError>;

    /// Exact version when given, otherwise the draft or the active row
    async fn get_one(
        &self,
        template_id: &str,
        draft: bool,
        version: Option<i64>,
    ) -> Result<Option<StoredTemplateHeader>, StorageError>;

    /// Draft and active rows, optionally restricted to one template
    async fn find_templates(&self, template_id: Option<&str>) -> Result<Vec<StoredTemplateHeader>, StorageError>;

    /// Active rows subscribed to `topic`
    async fn find_for_topic(&self, topic: &str) -> Result<Vec<StoredTemplateHeader>, StorageError>;

    /// Archive the current active row and promote the draft, returning the new active row.
    async fn publish(&self, template_id: &str) -> Result<StoredTemplateHeader, StorageError>;

    /// Delete the draft row, or every row when `draft` is false. Returns the deleted versions.
    async fn delete_templates(&self, template_id: &str, draft: bool) -> Result<Vec<i64>, StorageError>;

    /// Every template id that has ever been assigned a version
    async fn find_template_ids(&self) -> Result<Vec<String>, StorageError>;

    /// Repair duplicated active rows and the version counter; returns the number of fixes.
    async fn reconcile(&self, template_id: &str) -> Result<u64, StorageError>;
}

use crate::entities::task_body::StoredTaskBody;
use crate::error::StorageError;

#[async_trait::async_trait]
pub trait TaskBodyStorage: Send + Sync {
    /// Make `bodies` the complete task set of `template_id@version`.
    ///
    /// Bodies of that version missing from `bodies` are removed. Fails with
    /// [`StorageError::ConcurrentModification`] once a header exists for the version.
    async fn replace_task_bodies(
        &self,
        template_id: &str,
        version: i64,
        bodies: &[StoredTaskBody],
    ) -> Result<(), StorageError>;

    /// Task bodies of one template version, in task order
    async fn find_task_bodies(&self, template_id: &str, version: i64) -> Result<Vec<StoredTaskBody>, StorageError>;

    /// Delete the bodies of one version, or of every version when `version` is `None`
    async fn delete_task_bodies(&self, template_id: &str, version: Option<i64>) -> Result<u64, StorageError>;
}

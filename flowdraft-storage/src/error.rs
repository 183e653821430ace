use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Version conflict for template '{template_id}': expected version {expected}, got {actual}")]
    VersionConflict {
        template_id: String,
        expected: i64,
        actual: i64,
    },

    #[error("No draft to publish for template '{0}'")]
    NoDraft(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Concurrent modification detected: {0}")]
    ConcurrentModification(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

// SQLITE_BUSY / SQLITE_LOCKED，包括扩展错误码
fn is_busy_code(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| matches!(c & 0xff, 5 | 6))
        .unwrap_or(false)
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => StorageError::Unavailable(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::ConcurrentModification(db.message().to_string())
            }
            sqlx::Error::Database(db) if is_busy_code(db.code().as_deref()) => {
                StorageError::Unavailable(db.message().to_string())
            }
            _ => StorageError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_variants_display() {
        let err = StorageError::NotFound("foo".to_string());
        assert_eq!(format!("{}", err), "Entity not found: foo");

        let err = StorageError::VersionConflict {
            template_id: "wf".to_string(),
            expected: 3,
            actual: 5,
        };
        assert!(format!("{}", err).contains("expected version 3, got 5"));

        let err = StorageError::NoDraft("wf".to_string());
        assert!(format!("{}", err).contains("No draft"));

        let err = StorageError::Unavailable("pool timed out".to_string());
        assert!(format!("{}", err).contains("pool timed out"));
    }

    #[test]
    fn test_pool_failures_are_unavailable() {
        assert!(matches!(StorageError::from(sqlx::Error::PoolTimedOut), StorageError::Unavailable(_)));
        assert!(matches!(StorageError::from(sqlx::Error::PoolClosed), StorageError::Unavailable(_)));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(StorageError::from(sqlx::Error::Io(io)), StorageError::Unavailable(_)));
    }

    #[test]
    fn test_other_sqlx_errors_stay_database() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::Database(_)));
    }

    #[test]
    fn test_busy_codes() {
        assert!(is_busy_code(Some("5")));
        assert!(is_busy_code(Some("517")));
        assert!(is_busy_code(Some("6")));
        assert!(!is_busy_code(Some("2067")));
        assert!(!is_busy_code(None));
    }
}

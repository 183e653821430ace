use flowdraft_common::FlowdraftConfig;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 打开连接池并执行建表迁移
pub async fn init_db(cfg: &FlowdraftConfig) -> Result<Pool<Sqlite>, sqlx::Error> {
    if !cfg.db_path.starts_with("sqlite:") {
        if let Some(parent) = Path::new(&cfg.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let options = SqliteConnectOptions::from_str(&cfg.database_url())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(cfg.busy_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!(db_path = %cfg.db_path, "template store ready");

    Ok(pool)
}

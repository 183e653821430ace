use std::sync::Arc;

use anyhow::{Context, Result};
use flowdraft_common::config::FlowdraftConfig;
use flowdraft_dto::SchemaMarker;
use flowdraft_migrate::MigrationEngine;
use flowdraft_sqlite::{init_db, SqliteStorageManager};
use flowdraft_storage::db::DynPM;
use sqlx::SqlitePool;

use crate::app_state::AppState;

/// Migration engine ending at the configured schema marker.
pub fn build_engine(cfg: &FlowdraftConfig) -> Result<MigrationEngine> {
    let current: SchemaMarker = cfg
        .schema_version
        .parse()
        .with_context(|| format!("invalid schema version '{}'", cfg.schema_version))?;
    MigrationEngine::with_builtin_steps(current.clone())
        .with_context(|| format!("no migration path to schema '{}'", current))
}

/// Wire an already opened pool into the service graph.
pub fn build_app_state_with_pool(cfg: &FlowdraftConfig, pool: SqlitePool) -> Result<AppState> {
    let persist: DynPM = Arc::new(SqliteStorageManager::new(pool));
    let engine = Arc::new(build_engine(cfg)?);
    Ok(AppState::new(persist, engine))
}

pub async fn build_app_state(cfg: &FlowdraftConfig) -> Result<AppState> {
    // ---- DB & Storage ----
    let pool = init_db(cfg)
        .await
        .with_context(|| format!("failed to open template store at {}", cfg.db_path))?;

    // ---- Migration & Lifecycle ----
    build_app_state_with_pool(cfg, pool)
}

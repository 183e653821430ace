#![allow(dead_code)]

use chrono::{NaiveDateTime, Utc};
use flowdraft_dto::{SchemaMarker, TemplateGraph, TemplateState};
use flowdraft_sqlite::MIGRATOR;
use flowdraft_storage::entities::workflow_template::StoredTemplateHeader;
use once_cell::sync::Lazy;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::env;

// 测试数据库 URL，默认使用内存 SQLite 数据库
static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
});

// 内存库每个连接各自独立，所以只开一个连接
pub async fn setup_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&DATABASE_URL)
        .await
        .expect("Failed to create connection pool");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    pool
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn header(template_id: &str, version: i64, state: TemplateState) -> StoredTemplateHeader {
    let mut graph = TemplateGraph::new();
    graph.insert("1".to_string(), vec!["2".to_string()]);
    graph.insert("2".to_string(), vec![]);

    StoredTemplateHeader {
        template_id: template_id.to_string(),
        version,
        state,
        graph,
        topics: vec!["alerts".to_string()],
        policy: Some("start-new".to_string()),
        schema_marker: Some(SchemaMarker::release("4.0")),
        created_at: now(),
        updated_at: now(),
    }
}

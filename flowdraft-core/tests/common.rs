#![allow(dead_code)]

use flowdraft_common::FlowdraftConfig;
use flowdraft_core::builder::build_app_state_with_pool;
use flowdraft_core::AppState;
use flowdraft_dto::{DraftSpec, TaskDocument, TemplateGraph};
use flowdraft_sqlite::MIGRATOR;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::env;

static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
});

pub async fn setup_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&DATABASE_URL)
        .await
        .expect("Failed to create connection pool");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    pool
}

pub async fn setup_state() -> (AppState, Pool<Sqlite>) {
    let pool = setup_pool().await;
    let state = build_app_state_with_pool(&FlowdraftConfig::default(), pool.clone())
        .expect("Failed to build app state");
    (state, pool)
}

pub fn task(id: &str, name: &str, config: Value) -> TaskDocument {
    TaskDocument {
        id: id.to_string(),
        name: name.to_string(),
        config: config.as_object().cloned().unwrap_or_default(),
    }
}

/// Two-task draft: a trigger in the current nested shape, then a join.
pub fn draft_spec(id: &str, title: &str) -> DraftSpec {
    let mut graph = TemplateGraph::new();
    graph.insert("1".to_string(), vec!["2".to_string()]);
    graph.insert("2".to_string(), vec![]);

    DraftSpec {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        tags: vec!["ops".to_string()],
        policy: Some("start-new".to_string()),
        topics: vec!["alerts".to_string()],
        graph: Some(graph),
        tasks: Some(vec![
            task(
                "1",
                "trigger_workflow",
                json!({"template": {"service": "pipeline", "id": "child", "draft": false}, "label": "{host}"}),
            ),
            task("2", "join", json!({"wait": "@ticket"})),
        ]),
        schema_marker: None,
    }
}

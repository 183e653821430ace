mod common;
use common::{now, setup_pool};
use flowdraft_sqlite::crud::task_body_crud::*;
use flowdraft_sqlite::crud::workflow_template_crud::insert_template;
use flowdraft_sqlite::models::task_body::TaskBody;
use flowdraft_sqlite::models::workflow_template::WorkflowTemplate;
use flowdraft_sqlite::tx_exec;

fn body(version: i64, task_id: &str, position: i64, config: &str) -> TaskBody {
    TaskBody {
        template_id: "tpl_body".to_string(),
        version,
        task_id: task_id.to_string(),
        name: "sleep".to_string(),
        config: config.to_string(),
        position,
    }
}

#[tokio::test]
async fn test_upsert_is_idempotent_and_ordered() {
    let pool = setup_pool().await;
    let mut tx = pool.begin().await.unwrap();

    tx_exec!(tx, upsert_task_body(&body(1, "b", 1, r#"{"time":2}"#))).unwrap();
    tx_exec!(tx, upsert_task_body(&body(1, "a", 0, r#"{"time":1}"#))).unwrap();
    // 同一个 key 再写一次只覆盖
    tx_exec!(tx, upsert_task_body(&body(1, "b", 1, r#"{"time":3}"#))).unwrap();

    let bodies = tx_exec!(tx, find_task_bodies("tpl_body", 1)).unwrap();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0].task_id, "a");
    assert_eq!(bodies[1].config, r#"{"time":3}"#);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_delete_by_version_or_all() {
    let pool = setup_pool().await;
    let mut tx = pool.begin().await.unwrap();

    tx_exec!(tx, upsert_task_body(&body(1, "a", 0, "{}"))).unwrap();
    tx_exec!(tx, upsert_task_body(&body(2, "a", 0, "{}"))).unwrap();
    tx_exec!(tx, upsert_task_body(&body(3, "a", 0, "{}"))).unwrap();

    assert_eq!(tx_exec!(tx, delete_task_bodies("tpl_body", Some(2))).unwrap(), 1);
    assert!(tx_exec!(tx, find_task_bodies("tpl_body", 2)).unwrap().is_empty());
    assert_eq!(tx_exec!(tx, find_task_bodies("tpl_body", 3)).unwrap().len(), 1);

    assert_eq!(tx_exec!(tx, delete_task_bodies("tpl_body", None)).unwrap(), 2);
    assert_eq!(tx_exec!(tx, delete_task_bodies("tpl_body", None)).unwrap(), 0);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_delete_orphans_keeps_headed_and_newest() {
    let pool = setup_pool().await;
    let mut tx = pool.begin().await.unwrap();

    for version in [1, 2, 3] {
        tx_exec!(tx, upsert_task_body(&body(version, "a", 0, "{}"))).unwrap();
    }
    let header = WorkflowTemplate {
        template_id: "tpl_body".to_string(),
        version: 2,
        state: "draft".to_string(),
        graph: "{}".to_string(),
        topics: "[]".to_string(),
        policy: None,
        schema_marker: None,
        created_at: now(),
        updated_at: now(),
    };
    tx_exec!(tx, insert_template(&header)).unwrap();

    // 只有 v1：没有表头且低于 3
    assert_eq!(tx_exec!(tx, delete_orphan_task_bodies("tpl_body", 3)).unwrap(), 1);
    assert!(tx_exec!(tx, find_task_bodies("tpl_body", 1)).unwrap().is_empty());
    assert_eq!(tx_exec!(tx, find_task_bodies("tpl_body", 2)).unwrap().len(), 1);
    assert_eq!(tx_exec!(tx, find_task_bodies("tpl_body", 3)).unwrap().len(), 1);
    tx.rollback().await.unwrap();
}

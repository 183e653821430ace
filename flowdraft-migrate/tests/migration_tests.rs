use flowdraft_dto::{SchemaMarker, TaskDocument, TemplateDocument, TemplateGraph, TemplateState};
use flowdraft_migrate::{MigrationEngine, MigrationError};
use serde_json::{json, Value};

fn task(id: &str, name: &str, config: Value) -> TaskDocument {
    TaskDocument {
        id: id.to_string(),
        name: name.to_string(),
        config: config.as_object().cloned().unwrap_or_default(),
    }
}

fn legacy_doc(tasks: Vec<TaskDocument>) -> TemplateDocument {
    let mut graph = TemplateGraph::new();
    for t in &tasks {
        graph.insert(t.id.clone(), vec![]);
    }
    TemplateDocument {
        id: "wf".to_string(),
        version: 3,
        state: TemplateState::Active,
        title: Some("escalation".to_string()),
        tags: vec!["ops".to_string()],
        policy: None,
        topics: vec!["alerts".to_string()],
        graph,
        tasks: Some(tasks),
        schema_marker: Some(SchemaMarker::release("1.0")),
        updated_at: None,
    }
}

fn engine() -> MigrationEngine {
    MigrationEngine::with_builtin_steps(SchemaMarker::release("4.0")).unwrap()
}

#[test]
fn test_trigger_workflow_with_timeout() {
    let doc = legacy_doc(vec![task(
        "1",
        "trigger_workflow",
        json!({"nyuki_api": "pipeline/api", "template": "task-template-uid", "draft": false, "timeout": 6000}),
    )]);

    let out = engine().upgrade(&doc).unwrap();
    let config = &out.task("1").unwrap().config;
    assert_eq!(
        Value::Object(config.clone()),
        json!({
            "template": {"service": "pipeline", "id": "task-template-uid", "draft": false},
            "blocking": {"timeout": 6000}
        })
    );
    assert_eq!(out.schema_marker, Some(SchemaMarker::release("4.0")));
}

#[test]
fn test_trigger_workflow_without_timeout() {
    let doc = legacy_doc(vec![task(
        "1",
        "trigger_workflow",
        json!({"nyuki_api": "pipeline/api", "template": "task-template-uid", "draft": false}),
    )]);

    let out = engine().upgrade(&doc).unwrap();
    let config = &out.task("1").unwrap().config;
    assert!(!config.contains_key("blocking"));
    assert!(!config.contains_key("nyuki_api"));
    assert!(!config.contains_key("draft"));
    assert_eq!(config["template"]["id"], "task-template-uid");
}

#[test]
fn test_other_tasks_are_untouched() {
    let sleep = task("2", "sleep", json!({"time": 4, "nyuki_api": "keep/me"}));
    let doc = legacy_doc(vec![
        task("1", "trigger_workflow", json!({"nyuki_api": "a/b", "template": "x", "draft": true})),
        sleep.clone(),
    ]);

    let out = engine().upgrade(&doc).unwrap();
    assert_eq!(out.task("2").unwrap(), &sleep);
    assert_eq!(out.title, doc.title);
    assert_eq!(out.graph, doc.graph);
}

#[test]
fn test_upgrade_is_idempotent() {
    let doc = legacy_doc(vec![task(
        "1",
        "trigger_workflow",
        json!({"nyuki_api": "pipeline/api", "template": "x", "draft": false, "timeout": 10}),
    )]);
    let engine = engine();

    let once = engine.upgrade(&doc).unwrap();
    let twice = engine.upgrade(&once).unwrap();
    assert_eq!(once, twice);
    assert!(!engine.needs_upgrade(&once));
}

#[test]
fn test_upgrade_is_deterministic() {
    let doc = legacy_doc(vec![task(
        "1",
        "trigger_workflow",
        json!({"nyuki_api": "pipeline/api", "template": "x", "draft": false}),
    )]);
    let engine = engine();
    assert_eq!(engine.upgrade(&doc).unwrap(), engine.upgrade(&doc).unwrap());
}

#[test]
fn test_current_document_returned_unchanged() {
    let mut doc = legacy_doc(vec![task(
        "1",
        "trigger_workflow",
        json!({"template": {"service": "pipeline", "id": "x", "draft": false}}),
    )]);
    doc.schema_marker = Some(SchemaMarker::release("4.0"));
    assert_eq!(engine().upgrade(&doc).unwrap(), doc);
}

#[test]
fn test_malformed_task_leaves_original_intact() {
    let doc = legacy_doc(vec![
        task("1", "trigger_workflow", json!({"nyuki_api": "a/b", "template": "x", "draft": true})),
        task("2", "trigger_workflow", json!({"template": "y", "draft": false})),
    ]);
    let before = doc.clone();

    let err = engine().upgrade(&doc).unwrap_err();
    assert_eq!(
        err,
        MigrationError::MissingField {
            task_id: "2".to_string(),
            field: "nyuki_api"
        }
    );
    assert_eq!(doc, before);
}

#[test]
fn test_document_without_marker_treated_as_oldest() {
    let mut doc = legacy_doc(vec![task(
        "1",
        "trigger_workflow",
        json!({"nyuki_api": "pipeline/api", "template": "x", "draft": false}),
    )]);
    doc.schema_marker = None;

    let engine = engine();
    assert_eq!(engine.oldest(), &SchemaMarker::release("1.0"));
    let out = engine.upgrade(&doc).unwrap();
    assert_eq!(out.task("1").unwrap().config["template"]["service"], "pipeline");
}

#[test]
fn test_listing_without_tasks_still_stamped() {
    let mut doc = legacy_doc(vec![]);
    doc.tasks = None;
    let out = engine().upgrade(&doc).unwrap();
    assert!(out.tasks.is_none());
    assert_eq!(out.schema_marker, Some(SchemaMarker::release("4.0")));
}

#[test]
fn test_builtin_chain_rejects_unknown_current() {
    let err = MigrationEngine::with_builtin_steps(SchemaMarker::Step(7)).unwrap_err();
    assert!(matches!(err, MigrationError::UnreachableMarker { .. }));
}

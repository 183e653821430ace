use flowdraft_dto::TemplateDocument;
use serde_json::{json, Map, Value};

use crate::error::MigrationError;

pub const TASK_NAME: &str = "trigger_workflow";

/// Flat `nyuki_api`/`template`/`draft`/`timeout` become
/// `template: {service, id, draft}` plus an optional `blocking: {timeout}`.
pub fn nest_template_reference(doc: &mut TemplateDocument) -> Result<(), MigrationError> {
    let Some(tasks) = doc.tasks.as_mut() else {
        return Ok(());
    };
    for task in tasks.iter_mut().filter(|t| t.name == TASK_NAME) {
        rewrite_config(&task.id, &mut task.config)?;
    }
    Ok(())
}

fn field<'a>(task_id: &str, config: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, MigrationError> {
    config.get(name).ok_or_else(|| MigrationError::MissingField {
        task_id: task_id.to_string(),
        field: name,
    })
}

fn invalid(task_id: &str, field: &'static str, expected: &'static str) -> MigrationError {
    MigrationError::InvalidField {
        task_id: task_id.to_string(),
        field,
        expected,
    }
}

fn rewrite_config(task_id: &str, config: &mut Map<String, Value>) -> Result<(), MigrationError> {
    // 先全部校验，再改写
    let api = field(task_id, config, "nyuki_api")?
        .as_str()
        .ok_or_else(|| invalid(task_id, "nyuki_api", "string"))?;
    let service = api.split_once('/').map_or(api, |(service, _)| service).to_string();
    let template_id = field(task_id, config, "template")?
        .as_str()
        .ok_or_else(|| invalid(task_id, "template", "string"))?
        .to_string();
    let draft = field(task_id, config, "draft")?
        .as_bool()
        .ok_or_else(|| invalid(task_id, "draft", "boolean"))?;

    config.remove("nyuki_api");
    config.remove("draft");
    let timeout = config.remove("timeout").filter(|t| !t.is_null());

    config.insert(
        "template".to_string(),
        json!({ "service": service, "id": template_id, "draft": draft }),
    );
    if let Some(timeout) = timeout {
        config.insert("blocking".to_string(), json!({ "timeout": timeout }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_service_without_slash_is_whole_string() {
        let mut c = config(json!({"nyuki_api": "pipeline", "template": "x", "draft": true}));
        rewrite_config("1", &mut c).unwrap();
        assert_eq!(c["template"], json!({"service": "pipeline", "id": "x", "draft": true}));
        assert!(!c.contains_key("blocking"));
    }

    #[test]
    fn test_other_fields_pass_through() {
        let mut c = config(json!({
            "nyuki_api": "pipeline/api/v2",
            "template": "x",
            "draft": false,
            "timeout": 100,
            "priority": {"level": 3}
        }));
        rewrite_config("1", &mut c).unwrap();
        assert_eq!(c["template"]["service"], "pipeline");
        assert_eq!(c["blocking"], json!({"timeout": 100}));
        assert_eq!(c["priority"], json!({"level": 3}));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_null_timeout_adds_no_blocking() {
        let mut c = config(json!({"nyuki_api": "a/b", "template": "x", "draft": false, "timeout": null}));
        rewrite_config("1", &mut c).unwrap();
        assert!(!c.contains_key("blocking"));
        assert!(!c.contains_key("timeout"));
    }

    #[test]
    fn test_missing_and_ill_typed_fields() {
        let mut c = config(json!({"template": "x", "draft": false}));
        assert_eq!(
            rewrite_config("t1", &mut c).unwrap_err(),
            MigrationError::MissingField { task_id: "t1".into(), field: "nyuki_api" }
        );

        let mut c = config(json!({"nyuki_api": "a/b", "template": "x", "draft": "no"}));
        assert_eq!(
            rewrite_config("t1", &mut c).unwrap_err(),
            MigrationError::InvalidField { task_id: "t1".into(), field: "draft", expected: "boolean" }
        );
        // 校验失败时不做任何改写
        assert_eq!(c["nyuki_api"], "a/b");
    }
}

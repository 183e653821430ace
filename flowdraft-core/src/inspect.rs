//! Placeholder scan over task configuration.

use std::collections::BTreeSet;

use flowdraft_dto::TaskDocument;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// {name} 与 @name 两种占位写法
static BRACED_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-zA-Z_\-]+)\}").unwrap());
static AT_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([a-zA-Z_\-]+)").unwrap());

/// Every placeholder name used in string values of the tasks' config, sorted.
pub fn required_keys(tasks: &[TaskDocument]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for task in tasks {
        for value in task.config.values() {
            collect(value, &mut keys);
        }
    }
    keys.into_iter().collect()
}

fn collect(value: &Value, keys: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            for re in [&*BRACED_KEY, &*AT_KEY] {
                keys.extend(re.captures_iter(s).map(|c| c[1].to_string()));
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect(v, keys)),
        Value::Object(map) => map.values().for_each(|v| collect(v, keys)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(config: Value) -> TaskDocument {
        TaskDocument {
            id: "1".into(),
            name: "factory".into(),
            config: config.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_nested_placeholders() {
        let tasks = vec![
            task(json!({
                "rules": [
                    {"type": "set", "fieldname": "out", "value": "{host}-{port}"},
                    {"type": "condition", "condition": "@severity == 'high' and @host"}
                ],
                "retries": 3
            })),
            task(json!({"message": "alert on {host}", "flag": true})),
        ];
        assert_eq!(required_keys(&tasks), vec!["host", "port", "severity"]);
    }

    #[test]
    fn test_no_placeholders() {
        let tasks = vec![task(json!({"time": 4, "text": "plain {not valid1}"}))];
        assert!(required_keys(&tasks).is_empty());
    }
}

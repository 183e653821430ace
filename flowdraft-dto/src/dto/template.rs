use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::schema_marker::SchemaMarker;

/// task id -> 后继 task id 列表
pub type TemplateGraph = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateState {
    Draft,
    Active,
    Archived,
}

impl TemplateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateState::Draft => "draft",
            TemplateState::Active => "active",
            TemplateState::Archived => "archived",
        }
    }
}

impl FromStr for TemplateState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TemplateState::Draft),
            "active" => Ok(TemplateState::Active),
            "archived" => Ok(TemplateState::Archived),
            other => Err(format!("unknown template state '{}'", other)),
        }
    }
}

impl fmt::Display for TemplateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个任务：名称决定任务类型，config 为任意嵌套配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Merged view of a template version: header, metadata and task bodies.
///
/// This is the unit the migration engine rewrites and the shape returned to
/// callers of the lifecycle service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub id: String,
    pub version: i64,
    pub state: TemplateState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub graph: TemplateGraph,
    /// `None` when the listing was requested without task bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_marker: Option<SchemaMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl TemplateDocument {
    pub fn task(&self, task_id: &str) -> Option<&TaskDocument> {
        self.tasks.as_ref()?.iter().find(|t| t.id == task_id)
    }
}

/// 创建草稿的请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftSpec {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub graph: Option<TemplateGraph>,
    #[serde(default)]
    pub tasks: Option<Vec<TaskDocument>>,
    /// Marker the tasks were authored under; `None` means the current one.
    #[serde(default)]
    pub schema_marker: Option<SchemaMarker>,
}

/// 元数据的部分更新
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadataDto {
    pub template_id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_round_trips_lowercase() {
        assert_eq!(serde_json::to_value(TemplateState::Archived).unwrap(), json!("archived"));
        assert_eq!("active".parse::<TemplateState>().unwrap(), TemplateState::Active);
        assert!("published".parse::<TemplateState>().is_err());
    }

    #[test]
    fn test_draft_spec_accepts_minimal_body() {
        let spec: DraftSpec = serde_json::from_value(json!({
            "title": "test",
            "graph": {"1": []},
            "tasks": [{"id": "1", "name": "join"}]
        }))
        .unwrap();
        assert!(spec.id.is_none());
        assert!(spec.tags.is_empty());
        let tasks = spec.tasks.unwrap();
        assert_eq!(tasks[0].name, "join");
        assert!(tasks[0].config.is_empty());
    }

    #[test]
    fn test_document_omits_missing_tasks() {
        let doc = TemplateDocument {
            id: "wf".into(),
            version: 1,
            state: TemplateState::Draft,
            title: Some("t".into()),
            tags: vec![],
            policy: None,
            topics: vec![],
            graph: TemplateGraph::new(),
            tasks: None,
            schema_marker: Some(SchemaMarker::release("4.0")),
            updated_at: None,
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("tasks").is_none());
        assert_eq!(value["schema_marker"], json!("4.0"));
    }
}

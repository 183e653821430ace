use chrono::NaiveDateTime;
use flowdraft_dto::{SchemaMarker, TemplateGraph, TemplateState};
use serde::{Deserialize, Serialize};

/// Versioned template header. Task bodies live in their own collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTemplateHeader {
    pub template_id: String,
    pub version: i64,
    pub state: TemplateState,
    pub graph: TemplateGraph,
    pub topics: Vec<String>,
    pub policy: Option<String>,
    pub schema_marker: Option<SchemaMarker>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

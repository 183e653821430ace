use chrono::NaiveDateTime;

/// Raw header row; JSON columns are kept as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkflowTemplate {
    pub template_id: String,
    pub version: i64,
    pub state: String,
    pub graph: String,
    pub topics: String,
    pub policy: Option<String>,
    pub schema_marker: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

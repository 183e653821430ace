use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Descriptive data shared by every version of a template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredMetadata {
    pub template_id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateStoredMetadata {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
}

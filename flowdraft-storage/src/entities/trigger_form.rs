use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTriggerForm {
    pub template_id: String,
    pub form: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 触发表单：UI 用来启动某个模板的表单定义，与版本无关
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerFormDto {
    pub template_id: String,
    pub form: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

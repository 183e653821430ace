use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTaskBody {
    pub template_id: String,
    pub version: i64,
    pub task_id: String,
    pub name: String,
    pub config: Map<String, Value>,
    /// 任务在模板中的顺序
    pub position: i64,
}

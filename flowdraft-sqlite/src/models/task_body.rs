#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskBody {
    pub template_id: String,
    pub version: i64,
    pub task_id: String,
    pub name: String,
    pub config: String,
    pub position: i64,
}

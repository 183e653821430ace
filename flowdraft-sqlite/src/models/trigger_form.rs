use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TriggerForm {
    pub template_id: String,
    pub form: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

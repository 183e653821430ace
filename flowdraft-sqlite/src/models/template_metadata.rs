use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateMetadata {
    pub template_id: String,
    pub title: String,
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default)]
pub struct UpdateTemplateMetadata {
    pub title: Option<String>,
    pub tags: Option<String>,
}

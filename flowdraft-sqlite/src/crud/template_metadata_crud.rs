use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Result, Sqlite};
use crate::models::template_metadata::{TemplateMetadata, UpdateTemplateMetadata};

pub async fn create_metadata<'e, E>(executor: E, metadata: &TemplateMetadata) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO template_metadata (template_id, title, tags, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&metadata.template_id)
    .bind(&metadata.title)
    .bind(&metadata.tags)
    .bind(metadata.created_at)
    .bind(metadata.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_metadata<'e, E>(executor: E, template_id: &str) -> Result<Option<TemplateMetadata>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, TemplateMetadata>(
        r#"
        SELECT template_id, title, tags, created_at, updated_at
        FROM template_metadata WHERE template_id = ?
        "#,
    )
    .bind(template_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

// 部分更新，返回受影响行数
pub async fn update_metadata<'e, E>(
    executor: E,
    template_id: &str,
    changes: &UpdateTemplateMetadata,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE template_metadata SET ");
    let mut has_prev = false;

    macro_rules! set_field {
        ($field:ident) => {
            if let Some(value) = &changes.$field {
                if has_prev {
                    query.push(", ");
                }
                query.push(stringify!($field)).push(" = ").push_bind(value);
                has_prev = true;
            }
        };
    }

    set_field!(title);
    set_field!(tags);

    if has_prev {
        query.push(", updated_at = ").push_bind(Utc::now().naive_utc());
    } else {
        return Ok(0);
    }

    query.push(" WHERE template_id = ").push_bind(template_id);

    let res = query.build().execute(executor).await?;
    Ok(res.rows_affected())
}

pub async fn delete_metadata<'e, E>(executor: E, template_id: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM template_metadata WHERE template_id = ?")
        .bind(template_id)
        .execute(executor)
        .await?;
    Ok(())
}

use sqlx::{Executor, Result, Sqlite};
use crate::models::trigger_form::TriggerForm;

pub async fn upsert_trigger_form<'e, E>(executor: E, form: &TriggerForm) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO trigger_forms (template_id, form, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(template_id) DO UPDATE SET
            form = excluded.form,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&form.template_id)
    .bind(&form.form)
    .bind(form.created_at)
    .bind(form.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_trigger_form<'e, E>(executor: E, template_id: &str) -> Result<Option<TriggerForm>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, TriggerForm>(
        "SELECT template_id, form, created_at, updated_at FROM trigger_forms WHERE template_id = ?",
    )
    .bind(template_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn find_trigger_forms<'e, E>(executor: E) -> Result<Vec<TriggerForm>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, TriggerForm>(
        "SELECT template_id, form, created_at, updated_at FROM trigger_forms ORDER BY template_id",
    )
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn delete_trigger_form<'e, E>(executor: E, template_id: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM trigger_forms WHERE template_id = ?")
        .bind(template_id)
        .execute(executor)
        .await?;
    Ok(())
}

use sqlx::{Executor, QueryBuilder, Result, Sqlite};
use crate::models::task_body::TaskBody;

// 按 (template_id, version, task_id) 幂等写入
pub async fn upsert_task_body<'e, E>(executor: E, body: &TaskBody) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO task_bodies (template_id, version, task_id, name, config, position)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(template_id, version, task_id) DO UPDATE SET
            name = excluded.name,
            config = excluded.config,
            position = excluded.position
        "#,
    )
    .bind(&body.template_id)
    .bind(body.version)
    .bind(&body.task_id)
    .bind(&body.name)
    .bind(&body.config)
    .bind(body.position)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_task_bodies<'e, E>(executor: E, template_id: &str, version: i64) -> Result<Vec<TaskBody>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let bodies = sqlx::query_as::<_, TaskBody>(
        r#"
        SELECT template_id, version, task_id, name, config, position
        FROM task_bodies
        WHERE template_id = ? AND version = ?
        ORDER BY position, task_id
        "#,
    )
    .bind(template_id)
    .bind(version)
    .fetch_all(executor)
    .await?;
    Ok(bodies)
}

/// `version = None` removes the bodies of every version.
pub async fn delete_task_bodies<'e, E>(executor: E, template_id: &str, version: Option<i64>) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM task_bodies WHERE template_id = ");
    query.push_bind(template_id);
    if let Some(version) = version {
        query.push(" AND version = ").push_bind(version);
    }

    let res = query.build().execute(executor).await?;
    Ok(res.rows_affected())
}

// 只删版本号低于 below_version 且没有对应表头的任务体
pub async fn delete_orphan_task_bodies<'e, E>(executor: E, template_id: &str, below_version: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(
        r#"
        DELETE FROM task_bodies
        WHERE template_id = ? AND version < ?
          AND NOT EXISTS (
              SELECT 1 FROM workflow_templates w
              WHERE w.template_id = task_bodies.template_id AND w.version = task_bodies.version
          )
        "#,
    )
    .bind(template_id)
    .bind(below_version)
    .execute(executor)
    .await?;
    Ok(res.rows_affected())
}

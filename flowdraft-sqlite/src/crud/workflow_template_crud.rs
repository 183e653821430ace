use chrono::NaiveDateTime;
use sqlx::{Executor, QueryBuilder, Result, Sqlite};
use crate::models::workflow_template::WorkflowTemplate;

const SELECT_TEMPLATE: &str = r#"
    SELECT template_id, version, state, graph, topics, policy, schema_marker, created_at, updated_at
    FROM workflow_templates
"#;

// 插入一行模板头
pub async fn insert_template<'e, E>(executor: E, tpl: &WorkflowTemplate) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO workflow_templates
        (template_id, version, state, graph, topics, policy, schema_marker, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&tpl.template_id)
    .bind(tpl.version)
    .bind(&tpl.state)
    .bind(&tpl.graph)
    .bind(&tpl.topics)
    .bind(&tpl.policy)
    .bind(&tpl.schema_marker)
    .bind(tpl.created_at)
    .bind(tpl.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_template_by_version<'e, E>(
    executor: E,
    template_id: &str,
    version: i64,
) -> Result<Option<WorkflowTemplate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_TEMPLATE} WHERE template_id = ? AND version = ?");
    let row = sqlx::query_as::<_, WorkflowTemplate>(&sql)
        .bind(template_id)
        .bind(version)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

// 按状态取唯一行（draft / active），归档行可能有多条，取最新
pub async fn get_template_by_state<'e, E>(
    executor: E,
    template_id: &str,
    state: &str,
) -> Result<Option<WorkflowTemplate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_TEMPLATE} WHERE template_id = ? AND state = ? ORDER BY version DESC LIMIT 1");
    let row = sqlx::query_as::<_, WorkflowTemplate>(&sql)
        .bind(template_id)
        .bind(state)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn find_templates_by_state<'e, E>(
    executor: E,
    template_id: &str,
    state: &str,
) -> Result<Vec<WorkflowTemplate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_TEMPLATE} WHERE template_id = ? AND state = ? ORDER BY version DESC");
    let rows = sqlx::query_as::<_, WorkflowTemplate>(&sql)
        .bind(template_id)
        .bind(state)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

// 列出 draft + active 行，可选按模板过滤
pub async fn find_current_templates<'e, E>(
    executor: E,
    template_id: Option<&str>,
) -> Result<Vec<WorkflowTemplate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TEMPLATE);
    query.push(" WHERE state IN ('draft', 'active')");
    if let Some(id) = template_id {
        query.push(" AND template_id = ").push_bind(id);
    }
    query.push(" ORDER BY template_id, version");

    let rows = query
        .build_query_as::<WorkflowTemplate>()
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

pub async fn find_active_for_topic<'e, E>(executor: E, topic: &str) -> Result<Vec<WorkflowTemplate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "{SELECT_TEMPLATE} WHERE state = 'active' \
         AND EXISTS (SELECT 1 FROM json_each(workflow_templates.topics) WHERE json_each.value = ?) \
         ORDER BY template_id"
    );
    let rows = sqlx::query_as::<_, WorkflowTemplate>(&sql)
        .bind(topic)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

pub async fn find_template_ids<'e, E>(executor: E) -> Result<Vec<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    // 计数器行在整模板删除后仍保留，其任务体可能还需要 reconcile
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT template_id FROM workflow_templates
        UNION
        SELECT template_id FROM template_versions
        ORDER BY template_id
        "#,
    )
    .fetch_all(executor)
    .await?;
    Ok(ids)
}

pub async fn find_versions<'e, E>(executor: E, template_id: &str, state: Option<&str>) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut query = QueryBuilder::<Sqlite>::new("SELECT version FROM workflow_templates WHERE template_id = ");
    query.push_bind(template_id);
    if let Some(state) = state {
        query.push(" AND state = ").push_bind(state);
    }
    query.push(" ORDER BY version");

    let versions = query.build_query_scalar::<i64>().fetch_all(executor).await?;
    Ok(versions)
}

/// Move every row of `template_id` in `from` state to `to`.
pub async fn update_state<'e, E>(
    executor: E,
    template_id: &str,
    from: &str,
    to: &str,
    now: NaiveDateTime,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(
        "UPDATE workflow_templates SET state = ?, updated_at = ? WHERE template_id = ? AND state = ?",
    )
    .bind(to)
    .bind(now)
    .bind(template_id)
    .bind(from)
    .execute(executor)
    .await?;
    Ok(res.rows_affected())
}

pub async fn update_version_state<'e, E>(
    executor: E,
    template_id: &str,
    version: i64,
    to: &str,
    now: NaiveDateTime,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(
        "UPDATE workflow_templates SET state = ?, updated_at = ? WHERE template_id = ? AND version = ?",
    )
    .bind(to)
    .bind(now)
    .bind(template_id)
    .bind(version)
    .execute(executor)
    .await?;
    Ok(res.rows_affected())
}

// 删除模板头：指定 state 时只删该状态的行
pub async fn delete_templates<'e, E>(executor: E, template_id: &str, state: Option<&str>) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM workflow_templates WHERE template_id = ");
    query.push_bind(template_id);
    if let Some(state) = state {
        query.push(" AND state = ").push_bind(state);
    }

    let res = query.build().execute(executor).await?;
    Ok(res.rows_affected())
}

pub async fn max_stored_version<'e, E>(executor: E, template_id: &str) -> Result<Option<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let max = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT MAX(version) FROM workflow_templates WHERE template_id = ?",
    )
    .bind(template_id)
    .fetch_one(executor)
    .await?;
    Ok(max)
}

pub async fn get_version_counter<'e, E>(executor: E, template_id: &str) -> Result<Option<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let counter = sqlx::query_scalar::<_, i64>(
        "SELECT last_version FROM template_versions WHERE template_id = ?",
    )
    .bind(template_id)
    .fetch_optional(executor)
    .await?;
    Ok(counter)
}

/// Highest version ever assigned: counter row or stored headers, whichever is larger.
pub async fn last_version<'e, E>(executor: E, template_id: &str) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let last = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT MAX(v) FROM (
            SELECT last_version AS v FROM template_versions WHERE template_id = ?
            UNION ALL
            SELECT version AS v FROM workflow_templates WHERE template_id = ?
        )
        "#,
    )
    .bind(template_id)
    .bind(template_id)
    .fetch_one(executor)
    .await?;
    Ok(last.unwrap_or(0))
}

// 计数器只增不减
pub async fn bump_version_counter<'e, E>(executor: E, template_id: &str, version: i64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO template_versions (template_id, last_version) VALUES (?, ?)
        ON CONFLICT(template_id) DO UPDATE SET last_version = MAX(last_version, excluded.last_version)
        "#,
    )
    .bind(template_id)
    .bind(version)
    .execute(executor)
    .await?;
    Ok(())
}

/// Claim `last_version + 1` in one statement; concurrent callers never share a number.
pub async fn reserve_version<'e, E>(executor: E, template_id: &str) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let version = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO template_versions (template_id, last_version)
        VALUES (?, COALESCE((SELECT MAX(version) FROM workflow_templates WHERE template_id = ?), 0) + 1)
        ON CONFLICT(template_id) DO UPDATE SET
            last_version = MAX(template_versions.last_version, excluded.last_version - 1) + 1
        RETURNING last_version
        "#,
    )
    .bind(template_id)
    .bind(template_id)
    .fetch_one(executor)
    .await?;
    Ok(version)
}

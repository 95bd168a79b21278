//! Appeal queries

use common::models::{Appeal, AppealStatus, AppealUpdate, NewAppeal};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const APPEAL_COLUMNS: &str = "id, title, description, owner_user_id, status, rejection_reason, \
     is_urgent, created_at, updated_at";

fn appeal_from_row(row: &PgRow) -> Result<Appeal, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Appeal {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        owner_user_id: row.try_get("owner_user_id")?,
        status: status
            .parse::<AppealStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        rejection_reason: row.try_get("rejection_reason")?,
        is_urgent: row.try_get("is_urgent")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn insert(
    pool: &PgPool,
    owner_user_id: Option<Uuid>,
    appeal: &NewAppeal,
) -> Result<Appeal, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO appeals (id, title, description, owner_user_id, status, is_urgent,
                             created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'pending', FALSE, NOW(), NOW())
        RETURNING {APPEAL_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&appeal.title)
    .bind(&appeal.description)
    .bind(owner_user_id)
    .fetch_one(pool)
    .await?;

    appeal_from_row(&row)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Appeal>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {APPEAL_COLUMNS} FROM appeals WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(appeal_from_row).transpose()
}

pub async fn list(pool: &PgPool, status: Option<AppealStatus>) -> Result<Vec<Appeal>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {APPEAL_COLUMNS}
        FROM appeals
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY is_urgent DESC, created_at DESC
        "#
    ))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    rows.iter().map(appeal_from_row).collect()
}

/// Apply a partial update; absent fields keep their value
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &AppealUpdate,
) -> Result<Option<Appeal>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE appeals
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            is_urgent = COALESCE($4, is_urgent),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {APPEAL_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.is_urgent)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(appeal_from_row).transpose()
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: AppealStatus,
    rejection_reason: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE appeals
        SET status = $2,
            rejection_reason = COALESCE($3, rejection_reason),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(rejection_reason)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM appeals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

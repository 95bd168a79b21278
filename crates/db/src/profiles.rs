//! Profile queries

use common::models::{Profile, Role};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(Profile {
        id: row.try_get("id")?,
        display_name: row.try_get("display_name")?,
        role: role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        points: row.try_get("points")?,
        is_banned: row.try_get("is_banned")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Get profile by ID
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, display_name, role, points, is_banned, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(profile_from_row).transpose()
}

/// List all profiles, highest balance first
pub async fn list(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, display_name, role, points, is_banned, created_at, updated_at
        FROM profiles
        ORDER BY points DESC, created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(profile_from_row).collect()
}

pub async fn set_banned(pool: &PgPool, id: Uuid, banned: bool) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE profiles SET is_banned = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(banned)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn set_role(pool: &PgPool, id: Uuid, role: Role) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(role.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Overwrite a balance (manual admin correction only; awards go through increment_points)
pub async fn set_points(pool: &PgPool, id: Uuid, points: f64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE profiles SET points = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(points)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

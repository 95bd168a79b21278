//! Point values and the point ledger

use common::models::PointValue;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Configured reward for an action key, None if unconfigured
pub async fn get_value(pool: &PgPool, key: &str) -> Result<Option<f64>, sqlx::Error> {
    let row = sqlx::query("SELECT points FROM point_values WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    row.map(|r| r.try_get::<f64, _>("points")).transpose()
}

pub async fn list_values(pool: &PgPool) -> Result<Vec<PointValue>, sqlx::Error> {
    let rows = sqlx::query("SELECT key, points, updated_at FROM point_values ORDER BY key")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| PointValue {
            key: r.get("key"),
            points: r.get("points"),
            updated_at: r.get("updated_at"),
        })
        .collect())
}

pub async fn upsert_value(pool: &PgPool, key: &str, points: f64) -> Result<PointValue, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO point_values (key, points, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE
        SET points = EXCLUDED.points,
            updated_at = NOW()
        RETURNING key, points, updated_at
        "#,
    )
    .bind(key)
    .bind(points)
    .fetch_one(pool)
    .await?;

    Ok(PointValue {
        key: row.get("key"),
        points: row.get("points"),
        updated_at: row.get("updated_at"),
    })
}

/// Atomic server-side `points += amount`. Returns the new balance, None if no such profile.
pub async fn increment(pool: &PgPool, user_id: Uuid, amount: f64) -> Result<Option<f64>, sqlx::Error> {
    let row = sqlx::query("SELECT increment_points($1, $2) AS points")
        .bind(user_id)
        .bind(amount)
        .fetch_one(pool)
        .await?;

    row.try_get::<Option<f64>, _>("points")
}

/// Claim the item's upload award and pay the owner in one transaction.
///
/// The conditional update on `upload_points_awarded = FALSE` takes the row lock, so a
/// concurrent approval of the same item blocks here and then claims nothing.
/// Returns false if the award was already claimed. Nothing is written on error.
pub async fn award_item(
    pool: &PgPool,
    item_id: Uuid,
    owner_user_id: Uuid,
    amount: f64,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        r#"
        UPDATE items
        SET upload_points_awarded = TRUE, updated_at = NOW()
        WHERE id = $1 AND owner_user_id = $2 AND upload_points_awarded = FALSE
        "#,
    )
    .bind(item_id)
    .bind(owner_user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if !claimed {
        tx.rollback().await?;
        return Ok(false);
    }

    if amount > 0.0 {
        let row = sqlx::query("SELECT increment_points($1, $2) AS points")
            .bind(owner_user_id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;

        if row.try_get::<Option<f64>, _>("points")?.is_none() {
            tx.rollback().await?;
            return Err(sqlx::Error::RowNotFound);
        }
    }

    tx.commit().await?;
    Ok(true)
}

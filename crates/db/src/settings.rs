//! CMS settings queries

use common::models::Setting;
use sqlx::{PgPool, Row};

pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
    let rows = sqlx::query("SELECT key, value, updated_at FROM settings ORDER BY key")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| Setting {
            key: r.get("key"),
            value: r.get("value"),
            updated_at: r.get("updated_at"),
        })
        .collect())
}

pub async fn upsert(
    pool: &PgPool,
    key: &str,
    value: &serde_json::Value,
) -> Result<Setting, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE
        SET value = EXCLUDED.value,
            updated_at = NOW()
        RETURNING key, value, updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .fetch_one(pool)
    .await?;

    Ok(Setting {
        key: row.get("key"),
        value: row.get("value"),
        updated_at: row.get("updated_at"),
    })
}

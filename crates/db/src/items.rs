//! Item queries

use common::models::{Item, ItemAwardState, ItemStatus, NewItem};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const ITEM_COLUMNS: &str = "id, title, description, category_id, sub_category_id, status, \
     rejection_reason, owner_user_id, is_urgent, upload_points_awarded, created_at, updated_at";

fn item_from_row(row: &PgRow) -> Result<Item, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Item {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category_id: row.try_get("category_id")?,
        sub_category_id: row.try_get("sub_category_id")?,
        status: status
            .parse::<ItemStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        rejection_reason: row.try_get("rejection_reason")?,
        owner_user_id: row.try_get("owner_user_id")?,
        is_urgent: row.try_get("is_urgent")?,
        upload_points_awarded: row.try_get("upload_points_awarded")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert a newly submitted item (always pending, never awarded)
pub async fn insert(
    pool: &PgPool,
    owner_user_id: Option<Uuid>,
    item: &NewItem,
) -> Result<Item, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO items (id, title, description, category_id, sub_category_id, status,
                           owner_user_id, is_urgent, upload_points_awarded, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6, FALSE, FALSE, NOW(), NOW())
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&item.title)
    .bind(&item.description)
    .bind(item.category_id)
    .bind(item.sub_category_id)
    .bind(owner_user_id)
    .fetch_one(pool)
    .await?;

    item_from_row(&row)
}

/// Get item by ID
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(item_from_row).transpose()
}

/// List items, optionally filtered by status, newest first
pub async fn list(pool: &PgPool, status: Option<ItemStatus>) -> Result<Vec<Item>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {ITEM_COLUMNS}
        FROM items
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY created_at DESC
        "#
    ))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    rows.iter().map(item_from_row).collect()
}

/// Owner and award flag of an item
pub async fn get_award_state(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ItemAwardState>, sqlx::Error> {
    let row = sqlx::query("SELECT owner_user_id, upload_points_awarded FROM items WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| {
        Ok(ItemAwardState {
            owner_user_id: r.try_get("owner_user_id")?,
            upload_points_awarded: r.try_get("upload_points_awarded")?,
        })
    })
    .transpose()
}

/// Set the status; the reason column is only written when one is given.
/// Returns false if the item does not exist.
pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: ItemStatus,
    rejection_reason: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE items
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

/// Flip the urgency flag, returning the new value
pub async fn toggle_urgent(pool: &PgPool, id: Uuid) -> Result<Option<bool>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE items
        SET is_urgent = NOT is_urgent, updated_at = NOW()
        WHERE id = $1
        RETURNING is_urgent
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.try_get::<bool, _>("is_urgent")).transpose()
}

/// Hard delete
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

//! Category and sub-category queries

use common::models::{Category, SubCategory};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| Category {
            id: r.get("id"),
            name: r.get("name"),
            created_at: r.get("created_at"),
        })
        .collect())
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| Category {
        id: r.get("id"),
        name: r.get("name"),
        created_at: r.get("created_at"),
    }))
}

pub async fn insert(pool: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO categories (id, name, created_at)
        VALUES ($1, $2, NOW())
        RETURNING id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<Category>, sqlx::Error> {
    let row = sqlx::query(
        "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| Category {
        id: r.get("id"),
        name: r.get("name"),
        created_at: r.get("created_at"),
    }))
}

/// Sub-categories go with it (ON DELETE CASCADE)
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn list_sub(pool: &PgPool) -> Result<Vec<SubCategory>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, category_id, name, created_at FROM sub_categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| SubCategory {
            id: r.get("id"),
            category_id: r.get("category_id"),
            name: r.get("name"),
            created_at: r.get("created_at"),
        })
        .collect())
}

pub async fn get_sub_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SubCategory>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, category_id, name, created_at FROM sub_categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SubCategory {
        id: r.get("id"),
        category_id: r.get("category_id"),
        name: r.get("name"),
        created_at: r.get("created_at"),
    }))
}

pub async fn insert_sub(
    pool: &PgPool,
    category_id: Uuid,
    name: &str,
) -> Result<SubCategory, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO sub_categories (id, category_id, name, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING id, category_id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(SubCategory {
        id: row.get("id"),
        category_id: row.get("category_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

pub async fn rename_sub(
    pool: &PgPool,
    id: Uuid,
    name: &str,
) -> Result<Option<SubCategory>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE sub_categories SET name = $2 WHERE id = $1
        RETURNING id, category_id, name, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SubCategory {
        id: r.get("id"),
        category_id: r.get("category_id"),
        name: r.get("name"),
        created_at: r.get("created_at"),
    }))
}

pub async fn delete_sub(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sub_categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

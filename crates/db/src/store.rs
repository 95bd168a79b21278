//! Storage seams used by the moderation handlers
//!
//! `PgStore` delegates to the query modules of this crate; `MemoryStore`
//! (feature `memory`) backs the tests.

use async_trait::async_trait;
use common::models::{
    Appeal, AppealStatus, AppealUpdate, Category, Item, ItemAwardState, ItemStatus, NewAppeal,
    NewItem, PointValue, Profile, Role, Setting, SubCategory,
};
use common::{Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert_item(&self, owner_user_id: Option<Uuid>, item: &NewItem) -> Result<Item>;
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>>;
    async fn list_items(&self, status: Option<ItemStatus>) -> Result<Vec<Item>>;
    async fn item_award_state(&self, id: Uuid) -> Result<Option<ItemAwardState>>;
    /// Returns false if the item does not exist
    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool>;
    async fn toggle_item_urgent(&self, id: Uuid) -> Result<Option<bool>>;
    async fn delete_item(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn list_profiles(&self) -> Result<Vec<Profile>>;
    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool>;
    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool>;
    async fn set_points(&self, id: Uuid, points: f64) -> Result<bool>;
}

#[async_trait]
pub trait PointStore: Send + Sync {
    async fn point_value(&self, key: &str) -> Result<Option<f64>>;
    async fn list_point_values(&self) -> Result<Vec<PointValue>>;
    async fn upsert_point_value(&self, key: &str, points: f64) -> Result<PointValue>;
    /// Atomic `points += amount`; NotFound if the profile does not exist
    async fn increment_points(&self, user_id: Uuid, amount: f64) -> Result<f64>;
    /// Atomically set `upload_points_awarded` and, for a positive amount, pay the owner.
    /// Returns false if the flag was already set.
    async fn award_item_points(&self, item_id: Uuid, owner_user_id: Uuid, amount: f64)
        -> Result<bool>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn list_settings(&self) -> Result<Vec<Setting>>;
    async fn upsert_setting(&self, key: &str, value: &serde_json::Value) -> Result<Setting>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;
    async fn insert_category(&self, name: &str) -> Result<Category>;
    async fn rename_category(&self, id: Uuid, name: &str) -> Result<Option<Category>>;
    async fn delete_category(&self, id: Uuid) -> Result<bool>;
    async fn list_sub_categories(&self) -> Result<Vec<SubCategory>>;
    async fn get_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>>;
    async fn insert_sub_category(&self, category_id: Uuid, name: &str) -> Result<SubCategory>;
    async fn rename_sub_category(&self, id: Uuid, name: &str) -> Result<Option<SubCategory>>;
    async fn delete_sub_category(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait AppealStore: Send + Sync {
    async fn insert_appeal(&self, owner_user_id: Option<Uuid>, appeal: &NewAppeal)
        -> Result<Appeal>;
    async fn get_appeal(&self, id: Uuid) -> Result<Option<Appeal>>;
    async fn list_appeals(&self, status: Option<AppealStatus>) -> Result<Vec<Appeal>>;
    async fn update_appeal(&self, id: Uuid, changes: &AppealUpdate) -> Result<Option<Appeal>>;
    async fn set_appeal_status(
        &self,
        id: Uuid,
        status: AppealStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool>;
    async fn delete_appeal(&self, id: Uuid) -> Result<bool>;
}

/// Everything the handlers persist
pub trait Store:
    ItemStore + ProfileStore + PointStore + SettingsStore + CategoryStore + AppealStore
{
}

impl<T> Store for T where
    T: ItemStore + ProfileStore + PointStore + SettingsStore + CategoryStore + AppealStore
{
}

fn db_err(e: sqlx::Error) -> Error {
    Error::Database(e.to_string())
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn insert_item(&self, owner_user_id: Option<Uuid>, item: &NewItem) -> Result<Item> {
        crate::items::insert(&self.pool, owner_user_id, item)
            .await
            .map_err(db_err)
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        crate::items::get_by_id(&self.pool, id).await.map_err(db_err)
    }

    async fn list_items(&self, status: Option<ItemStatus>) -> Result<Vec<Item>> {
        crate::items::list(&self.pool, status).await.map_err(db_err)
    }

    async fn item_award_state(&self, id: Uuid) -> Result<Option<ItemAwardState>> {
        crate::items::get_award_state(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        crate::items::set_status(&self.pool, id, status, rejection_reason)
            .await
            .map_err(db_err)
    }

    async fn toggle_item_urgent(&self, id: Uuid) -> Result<Option<bool>> {
        crate::items::toggle_urgent(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn delete_item(&self, id: Uuid) -> Result<bool> {
        crate::items::delete(&self.pool, id).await.map_err(db_err)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        crate::profiles::get_by_id(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        crate::profiles::list(&self.pool).await.map_err(db_err)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool> {
        crate::profiles::set_banned(&self.pool, id, banned)
            .await
            .map_err(db_err)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool> {
        crate::profiles::set_role(&self.pool, id, role)
            .await
            .map_err(db_err)
    }

    async fn set_points(&self, id: Uuid, points: f64) -> Result<bool> {
        crate::profiles::set_points(&self.pool, id, points)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl PointStore for PgStore {
    async fn point_value(&self, key: &str) -> Result<Option<f64>> {
        crate::points::get_value(&self.pool, key)
            .await
            .map_err(db_err)
    }

    async fn list_point_values(&self) -> Result<Vec<PointValue>> {
        crate::points::list_values(&self.pool).await.map_err(db_err)
    }

    async fn upsert_point_value(&self, key: &str, points: f64) -> Result<PointValue> {
        crate::points::upsert_value(&self.pool, key, points)
            .await
            .map_err(db_err)
    }

    async fn increment_points(&self, user_id: Uuid, amount: f64) -> Result<f64> {
        crate::points::increment(&self.pool, user_id, amount)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::NotFound(format!("Profile {} not found", user_id)))
    }

    async fn award_item_points(
        &self,
        item_id: Uuid,
        owner_user_id: Uuid,
        amount: f64,
    ) -> Result<bool> {
        crate::points::award_item(&self.pool, item_id, owner_user_id, amount)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn list_settings(&self) -> Result<Vec<Setting>> {
        crate::settings::list(&self.pool).await.map_err(db_err)
    }

    async fn upsert_setting(&self, key: &str, value: &serde_json::Value) -> Result<Setting> {
        crate::settings::upsert(&self.pool, key, value)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        crate::categories::list(&self.pool).await.map_err(db_err)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        crate::categories::get_by_id(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn insert_category(&self, name: &str) -> Result<Category> {
        crate::categories::insert(&self.pool, name)
            .await
            .map_err(db_err)
    }

    async fn rename_category(&self, id: Uuid, name: &str) -> Result<Option<Category>> {
        crate::categories::rename(&self.pool, id, name)
            .await
            .map_err(db_err)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        crate::categories::delete(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn list_sub_categories(&self) -> Result<Vec<SubCategory>> {
        crate::categories::list_sub(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn get_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>> {
        crate::categories::get_sub_by_id(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn insert_sub_category(&self, category_id: Uuid, name: &str) -> Result<SubCategory> {
        crate::categories::insert_sub(&self.pool, category_id, name)
            .await
            .map_err(db_err)
    }

    async fn rename_sub_category(&self, id: Uuid, name: &str) -> Result<Option<SubCategory>> {
        crate::categories::rename_sub(&self.pool, id, name)
            .await
            .map_err(db_err)
    }

    async fn delete_sub_category(&self, id: Uuid) -> Result<bool> {
        crate::categories::delete_sub(&self.pool, id)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl AppealStore for PgStore {
    async fn insert_appeal(
        &self,
        owner_user_id: Option<Uuid>,
        appeal: &NewAppeal,
    ) -> Result<Appeal> {
        crate::appeals::insert(&self.pool, owner_user_id, appeal)
            .await
            .map_err(db_err)
    }

    async fn get_appeal(&self, id: Uuid) -> Result<Option<Appeal>> {
        crate::appeals::get_by_id(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn list_appeals(&self, status: Option<AppealStatus>) -> Result<Vec<Appeal>> {
        crate::appeals::list(&self.pool, status)
            .await
            .map_err(db_err)
    }

    async fn update_appeal(&self, id: Uuid, changes: &AppealUpdate) -> Result<Option<Appeal>> {
        crate::appeals::update(&self.pool, id, changes)
            .await
            .map_err(db_err)
    }

    async fn set_appeal_status(
        &self,
        id: Uuid,
        status: AppealStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        crate::appeals::set_status(&self.pool, id, status, rejection_reason)
            .await
            .map_err(db_err)
    }

    async fn delete_appeal(&self, id: Uuid) -> Result<bool> {
        crate::appeals::delete(&self.pool, id)
            .await
            .map_err(db_err)
    }
}

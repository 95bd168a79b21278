//! In-memory store with failure injection, for tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use common::models::{
    Appeal, AppealStatus, AppealUpdate, Category, Item, ItemAwardState, ItemStatus, NewAppeal,
    NewItem, PointValue, Profile, Role, Setting, SubCategory,
};
use common::{Error, Result};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::store::{
    AppealStore, CategoryStore, ItemStore, PointStore, ProfileStore, SettingsStore,
};

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    ItemAwardState,
    ItemStatusUpdate,
    ProfileLookup,
    PointValue,
    Increment,
}

#[derive(Default)]
struct State {
    items: HashMap<Uuid, Item>,
    profiles: HashMap<Uuid, Profile>,
    point_values: HashMap<String, PointValue>,
    settings: HashMap<String, Setting>,
    categories: HashMap<Uuid, Category>,
    sub_categories: HashMap<Uuid, SubCategory>,
    appeals: HashMap<Uuid, Appeal>,
    failing: HashSet<FailPoint>,
    increments: usize,
}

impl State {
    fn check(&self, point: FailPoint) -> Result<()> {
        if self.failing.contains(&point) {
            return Err(Error::Database(format!("injected failure: {:?}", point)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail(&self, point: FailPoint) {
        self.state.lock().await.failing.insert(point);
    }

    pub async fn recover(&self, point: FailPoint) {
        self.state.lock().await.failing.remove(&point);
    }

    pub async fn add_profile(&self, id: Uuid, role: Role, points: f64) -> Profile {
        let now = Utc::now();
        let profile = Profile {
            id,
            display_name: None,
            role,
            points,
            is_banned: false,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.profiles.insert(id, profile.clone());
        profile
    }

    /// Insert a pending item with the given owner and award flag
    pub async fn add_item(&self, owner_user_id: Option<Uuid>, upload_points_awarded: bool) -> Item {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            title: "Winter coat".to_string(),
            description: None,
            category_id: None,
            sub_category_id: None,
            status: ItemStatus::Pending,
            rejection_reason: None,
            owner_user_id,
            is_urgent: false,
            upload_points_awarded,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.items.insert(item.id, item.clone());
        item
    }

    pub async fn item(&self, id: Uuid) -> Option<Item> {
        self.state.lock().await.items.get(&id).cloned()
    }

    pub async fn profile(&self, id: Uuid) -> Option<Profile> {
        self.state.lock().await.profiles.get(&id).cloned()
    }

    /// Number of balance changes applied so far
    pub async fn increment_count(&self) -> usize {
        self.state.lock().await.increments
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn insert_item(&self, owner_user_id: Option<Uuid>, item: &NewItem) -> Result<Item> {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            title: item.title.clone(),
            description: item.description.clone(),
            category_id: item.category_id,
            sub_category_id: item.sub_category_id,
            status: ItemStatus::Pending,
            rejection_reason: None,
            owner_user_id,
            is_urgent: false,
            upload_points_awarded: false,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        Ok(self.state.lock().await.items.get(&id).cloned())
    }

    async fn list_items(&self, status: Option<ItemStatus>) -> Result<Vec<Item>> {
        let state = self.state.lock().await;
        let mut items: Vec<Item> = state
            .items
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn item_award_state(&self, id: Uuid) -> Result<Option<ItemAwardState>> {
        let state = self.state.lock().await;
        state.check(FailPoint::ItemAwardState)?;
        Ok(state.items.get(&id).map(|i| ItemAwardState {
            owner_user_id: i.owner_user_id,
            upload_points_awarded: i.upload_points_awarded,
        }))
    }

    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::ItemStatusUpdate)?;
        let Some(item) = state.items.get_mut(&id) else {
            return Ok(false);
        };
        item.status = status;
        if let Some(reason) = rejection_reason {
            item.rejection_reason = Some(reason.to_string());
        }
        item.updated_at = Utc::now();
        Ok(true)
    }

    async fn toggle_item_urgent(&self, id: Uuid) -> Result<Option<bool>> {
        let mut state = self.state.lock().await;
        Ok(state.items.get_mut(&id).map(|item| {
            item.is_urgent = !item.is_urgent;
            item.updated_at = Utc::now();
            item.is_urgent
        }))
    }

    async fn delete_item(&self, id: Uuid) -> Result<bool> {
        Ok(self.state.lock().await.items.remove(&id).is_some())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        let state = self.state.lock().await;
        state.check(FailPoint::ProfileLookup)?;
        Ok(state.profiles.get(&id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let state = self.state.lock().await;
        let mut profiles: Vec<Profile> = state.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| b.points.total_cmp(&a.points));
        Ok(profiles)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state
            .profiles
            .get_mut(&id)
            .map(|p| p.is_banned = banned)
            .is_some())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state.profiles.get_mut(&id).map(|p| p.role = role).is_some())
    }

    async fn set_points(&self, id: Uuid, points: f64) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state
            .profiles
            .get_mut(&id)
            .map(|p| p.points = points)
            .is_some())
    }
}

#[async_trait]
impl PointStore for MemoryStore {
    async fn point_value(&self, key: &str) -> Result<Option<f64>> {
        let state = self.state.lock().await;
        state.check(FailPoint::PointValue)?;
        Ok(state.point_values.get(key).map(|v| v.points))
    }

    async fn list_point_values(&self) -> Result<Vec<PointValue>> {
        let state = self.state.lock().await;
        let mut values: Vec<PointValue> = state.point_values.values().cloned().collect();
        values.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(values)
    }

    async fn upsert_point_value(&self, key: &str, points: f64) -> Result<PointValue> {
        let value = PointValue {
            key: key.to_string(),
            points,
            updated_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .point_values
            .insert(key.to_string(), value.clone());
        Ok(value)
    }

    async fn increment_points(&self, user_id: Uuid, amount: f64) -> Result<f64> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::Increment)?;
        let profile = state
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound(format!("Profile {} not found", user_id)))?;
        profile.points += amount;
        let points = profile.points;
        state.increments += 1;
        Ok(points)
    }

    async fn award_item_points(
        &self,
        item_id: Uuid,
        owner_user_id: Uuid,
        amount: f64,
    ) -> Result<bool> {
        let mut state = self.state.lock().await;

        let claimable = state.items.get(&item_id).is_some_and(|i| {
            i.owner_user_id == Some(owner_user_id) && !i.upload_points_awarded
        });
        if !claimable {
            return Ok(false);
        }

        if amount > 0.0 {
            state.check(FailPoint::Increment)?;
            let profile = state
                .profiles
                .get_mut(&owner_user_id)
                .ok_or_else(|| Error::NotFound(format!("Profile {} not found", owner_user_id)))?;
            profile.points += amount;
            state.increments += 1;
        }

        if let Some(item) = state.items.get_mut(&item_id) {
            item.upload_points_awarded = true;
        }
        Ok(true)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn list_settings(&self) -> Result<Vec<Setting>> {
        let state = self.state.lock().await;
        let mut settings: Vec<Setting> = state.settings.values().cloned().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn upsert_setting(&self, key: &str, value: &serde_json::Value) -> Result<Setting> {
        let setting = Setting {
            key: key.to_string(),
            value: value.clone(),
            updated_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .settings
            .insert(key.to_string(), setting.clone());
        Ok(setting)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn insert_category(&self, name: &str) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .categories
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn rename_category(&self, id: Uuid, name: &str) -> Result<Option<Category>> {
        let mut state = self.state.lock().await;
        Ok(state.categories.get_mut(&id).map(|c| {
            c.name = name.to_string();
            c.clone()
        }))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        let removed = state.categories.remove(&id).is_some();
        if removed {
            state.sub_categories.retain(|_, s| s.category_id != id);
        }
        Ok(removed)
    }

    async fn list_sub_categories(&self) -> Result<Vec<SubCategory>> {
        let state = self.state.lock().await;
        let mut subs: Vec<SubCategory> = state.sub_categories.values().cloned().collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subs)
    }

    async fn get_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>> {
        Ok(self.state.lock().await.sub_categories.get(&id).cloned())
    }

    async fn insert_sub_category(&self, category_id: Uuid, name: &str) -> Result<SubCategory> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&category_id) {
            return Err(Error::Database(format!(
                "foreign key violation: category {} does not exist",
                category_id
            )));
        }
        let sub = SubCategory {
            id: Uuid::new_v4(),
            category_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.sub_categories.insert(sub.id, sub.clone());
        Ok(sub)
    }

    async fn rename_sub_category(&self, id: Uuid, name: &str) -> Result<Option<SubCategory>> {
        let mut state = self.state.lock().await;
        Ok(state.sub_categories.get_mut(&id).map(|s| {
            s.name = name.to_string();
            s.clone()
        }))
    }

    async fn delete_sub_category(&self, id: Uuid) -> Result<bool> {
        Ok(self.state.lock().await.sub_categories.remove(&id).is_some())
    }
}

#[async_trait]
impl AppealStore for MemoryStore {
    async fn insert_appeal(
        &self,
        owner_user_id: Option<Uuid>,
        appeal: &NewAppeal,
    ) -> Result<Appeal> {
        let now = Utc::now();
        let appeal = Appeal {
            id: Uuid::new_v4(),
            title: appeal.title.clone(),
            description: appeal.description.clone(),
            owner_user_id,
            status: AppealStatus::Pending,
            rejection_reason: None,
            is_urgent: false,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .appeals
            .insert(appeal.id, appeal.clone());
        Ok(appeal)
    }

    async fn get_appeal(&self, id: Uuid) -> Result<Option<Appeal>> {
        Ok(self.state.lock().await.appeals.get(&id).cloned())
    }

    async fn list_appeals(&self, status: Option<AppealStatus>) -> Result<Vec<Appeal>> {
        let state = self.state.lock().await;
        let mut appeals: Vec<Appeal> = state
            .appeals
            .values()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        appeals.sort_by(|a, b| {
            b.is_urgent
                .cmp(&a.is_urgent)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(appeals)
    }

    async fn update_appeal(&self, id: Uuid, changes: &AppealUpdate) -> Result<Option<Appeal>> {
        let mut state = self.state.lock().await;
        Ok(state.appeals.get_mut(&id).map(|a| {
            if let Some(title) = &changes.title {
                a.title = title.clone();
            }
            if let Some(description) = &changes.description {
                a.description = Some(description.clone());
            }
            if let Some(is_urgent) = changes.is_urgent {
                a.is_urgent = is_urgent;
            }
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn set_appeal_status(
        &self,
        id: Uuid,
        status: AppealStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some(appeal) = state.appeals.get_mut(&id) else {
            return Ok(false);
        };
        appeal.status = status;
        if let Some(reason) = rejection_reason {
            appeal.rejection_reason = Some(reason.to_string());
        }
        appeal.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_appeal(&self, id: Uuid) -> Result<bool> {
        Ok(self.state.lock().await.appeals.remove(&id).is_some())
    }
}

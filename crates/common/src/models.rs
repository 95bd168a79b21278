//! Domain models

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Point action keys
pub mod actions {
    pub const UPLOAD_ITEM: &str = "upload_item";
    pub const DONATE_ITEM: &str = "donate_item";
    pub const VOLUNTEER_DELIVERY: &str = "volunteer_delivery";
}

/// Lifecycle state of a donation listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Active,
    Rejected,
    Donated,
    Deleted,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Active => "active",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Donated => "donated",
            ItemStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "active" => Ok(ItemStatus::Active),
            "rejected" => Ok(ItemStatus::Rejected),
            "donated" => Ok(ItemStatus::Donated),
            "deleted" => Ok(ItemStatus::Deleted),
            other => Err(Error::Validation(format!("unknown item status '{}'", other))),
        }
    }
}

/// The two statuses a moderator can move an item into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Active,
    Rejected,
}

impl From<ModerationStatus> for ItemStatus {
    fn from(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Active => ItemStatus::Active,
            ModerationStatus::Rejected => ItemStatus::Rejected,
        }
    }
}

/// A donatable physical object listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub status: ItemStatus,
    pub rejection_reason: Option<String>,
    /// None for guest submissions
    pub owner_user_id: Option<Uuid>,
    pub is_urgent: bool,
    pub upload_points_awarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a new listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub sub_category_id: Option<Uuid>,
}

/// The slice of an item the point award needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAwardState {
    pub owner_user_id: Option<Uuid>,
    pub upload_points_awarded: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Validation(format!("unknown role '{}'", other))),
        }
    }
}

/// A user record (identity is owned by the auth provider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub role: Role,
    pub points: f64,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Configured reward for an action key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointValue {
    pub key: String,
    pub points: f64,
    pub updated_at: DateTime<Utc>,
}

/// A CMS key/value row (banner, theme, footer, flags)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Immutable view of all settings, passed explicitly to whoever needs it
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsSnapshot {
    values: HashMap<String, serde_json::Value>,
}

impl SettingsSnapshot {
    pub fn from_settings(settings: Vec<Setting>) -> Self {
        Self {
            values: settings.into_iter().map(|s| (s.key, s.value)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A category together with its sub-categories
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppealStatus {
    Pending,
    Active,
    Rejected,
    Closed,
}

impl AppealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppealStatus::Pending => "pending",
            AppealStatus::Active => "active",
            AppealStatus::Rejected => "rejected",
            AppealStatus::Closed => "closed",
        }
    }
}

impl FromStr for AppealStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppealStatus::Pending),
            "active" => Ok(AppealStatus::Active),
            "rejected" => Ok(AppealStatus::Rejected),
            "closed" => Ok(AppealStatus::Closed),
            other => Err(Error::Validation(format!("unknown appeal status '{}'", other))),
        }
    }
}

/// A community help request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appeal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_user_id: Option<Uuid>,
    pub status: AppealStatus,
    pub rejection_reason: Option<String>,
    pub is_urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppeal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update; None (or blank text) leaves the field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppealUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_urgent: Option<bool>,
}

//! Cached read views affected by each kind of mutation

use revalidate::Invalidation;
use uuid::Uuid;

pub const MODERATION_QUEUE: &str = "/admin/moderation";
pub const ADMIN_DASHBOARD: &str = "/admin";
pub const ITEM_LIST: &str = "/items";
pub const APPEAL_LIST: &str = "/appeals";
pub const HOME: &str = "/";

/// Moderation queue, dashboard, public list and the item's own page
pub fn item(id: Uuid) -> Invalidation {
    Invalidation::new()
        .path(MODERATION_QUEUE)
        .path(ADMIN_DASHBOARD)
        .path(ITEM_LIST)
        .path(format!("{}/{}", ITEM_LIST, id))
        .tag("items")
}

pub fn appeal(id: Uuid) -> Invalidation {
    Invalidation::new()
        .path(MODERATION_QUEUE)
        .path(ADMIN_DASHBOARD)
        .path(APPEAL_LIST)
        .path(format!("{}/{}", APPEAL_LIST, id))
        .tag("appeals")
}

pub fn categories() -> Invalidation {
    Invalidation::new()
        .path(HOME)
        .path(ITEM_LIST)
        .tag("categories")
}

pub fn settings() -> Invalidation {
    Invalidation::new().path(HOME).tag("settings")
}

/// Reward table shown on the admin dashboard
pub fn point_values() -> Invalidation {
    Invalidation::new()
        .path(ADMIN_DASHBOARD)
        .tag("point_values")
}

pub fn profiles() -> Invalidation {
    Invalidation::new().path(ADMIN_DASHBOARD).tag("profiles")
}

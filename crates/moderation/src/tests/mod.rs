//! Shared fixtures for handler tests

use std::sync::Arc;

use common::models::Role;
use db::{MemoryStore, PointStore};
use revalidate::RecordingRevalidator;
use uuid::Uuid;

use crate::{Caller, ModerationService, PointAwarder, PointLedger};

pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub revalidator: Arc<RecordingRevalidator>,
    pub service: ModerationService,
}

impl Harness {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let revalidator = Arc::new(RecordingRevalidator::new());
        let service = ModerationService::new(store.clone(), revalidator.clone());
        Self {
            store,
            revalidator,
            service,
        }
    }

    async fn caller_with(&self, role: Role, points: f64) -> Caller {
        let id = Uuid::new_v4();
        self.store.add_profile(id, role, points).await;
        Caller::new(id)
    }

    pub async fn admin(&self) -> Caller {
        self.caller_with(Role::Admin, 0.0).await
    }

    pub async fn moderator(&self) -> Caller {
        self.caller_with(Role::Moderator, 0.0).await
    }

    pub async fn member(&self, points: f64) -> Caller {
        self.caller_with(Role::User, points).await
    }

    pub async fn points(&self, caller: Caller) -> f64 {
        self.store
            .profile(caller.user_id)
            .await
            .map(|p| p.points)
            .unwrap_or_default()
    }

    pub async fn set_point_value(&self, key: &str, points: f64) {
        self.store.upsert_point_value(key, points).await.unwrap();
    }

    pub fn awarder(&self) -> PointAwarder {
        PointAwarder::new(self.store.clone(), PointLedger::new(self.store.clone()))
    }

    /// Number of invalidations sent so far
    pub fn invalidation_count(&self) -> usize {
        self.revalidator.invalidations().len()
    }
}

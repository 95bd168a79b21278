//! Caller authorization
//!
//! Every mutating handler calls [`Guard::require`] once on entry, before touching
//! any row. Row-level policies in the database re-check the same rules.

use std::sync::Arc;

use common::models::{Profile, Role};
use common::{Error, Result};
use db::{ProfileStore, Store};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity resolved by the auth provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
}

impl Caller {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Required privilege level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Admin or moderator
    Staff,
    Admin,
}

impl Access {
    fn allows(&self, role: Role) -> bool {
        match self {
            Access::Staff => role.is_staff(),
            Access::Admin => role == Role::Admin,
        }
    }
}

/// Proof that the caller passed the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl StaffContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone)]
pub struct Guard {
    store: Arc<dyn Store>,
}

impl Guard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve the caller to a staff context or fail with `Unauthorized`
    pub async fn require(&self, caller: Option<&Caller>, access: Access) -> Result<StaffContext> {
        let profile = self.require_member(caller).await?;

        if !access.allows(profile.role) {
            return Err(Error::Unauthorized(format!(
                "role '{}' may not perform this action",
                profile.role.as_str()
            )));
        }

        Ok(StaffContext {
            user_id: profile.id,
            role: profile.role,
        })
    }

    /// Any signed-in, non-banned user with a profile
    pub async fn require_member(&self, caller: Option<&Caller>) -> Result<Profile> {
        let caller =
            caller.ok_or_else(|| Error::Unauthorized("sign-in required".to_string()))?;

        let profile = self
            .store
            .get_profile(caller.user_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("no profile for caller".to_string()))?;

        if profile.is_banned {
            return Err(Error::Unauthorized("account is banned".to_string()));
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::MemoryStore;

    async fn guard_with(role: Role) -> (Guard, Arc<MemoryStore>, Caller) {
        let store = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();
        store.add_profile(id, role, 0.0).await;
        (Guard::new(store.clone()), store, Caller::new(id))
    }

    #[tokio::test]
    async fn test_moderator_passes_staff_but_not_admin() {
        let (guard, _, caller) = guard_with(Role::Moderator).await;

        let ctx = guard.require(Some(&caller), Access::Staff).await.unwrap();
        assert_eq!(ctx.role, Role::Moderator);
        assert!(!ctx.is_admin());

        let err = guard.require(Some(&caller), Access::Admin).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_plain_user_is_rejected() {
        let (guard, _, caller) = guard_with(Role::User).await;

        let err = guard.require(Some(&caller), Access::Staff).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_anonymous_and_unknown_callers_are_rejected() {
        let (guard, _, _) = guard_with(Role::Admin).await;

        let err = guard.require(None, Access::Staff).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let stranger = Caller::new(Uuid::new_v4());
        let err = guard.require(Some(&stranger), Access::Staff).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_banned_admin_is_rejected() {
        let (guard, store, caller) = guard_with(Role::Admin).await;
        db::ProfileStore::set_banned(store.as_ref(), caller.user_id, true)
            .await
            .unwrap();

        let err = guard.require(Some(&caller), Access::Admin).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }
}

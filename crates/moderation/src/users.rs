//! Bans and roles

use common::models::{Profile, Role};
use common::{Error, Result};
use db::ProfileStore;
use tracing::info;
use uuid::Uuid;

use crate::guard::{Access, Caller};
use crate::{views, ModerationService};

impl ModerationService {
    pub async fn get_profile(&self, id: Uuid) -> Result<Profile> {
        self.store
            .get_profile(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Profile {} not found", id)))
    }

    /// All profiles (staff)
    pub async fn list_profiles(&self, caller: Option<&Caller>) -> Result<Vec<Profile>> {
        self.guard.require(caller, Access::Staff).await?;
        self.store.list_profiles().await
    }

    /// Ban or unban (staff). Moderators may only ban plain users; nobody bans themselves.
    pub async fn set_ban(
        &self,
        caller: Option<&Caller>,
        user_id: Uuid,
        banned: bool,
    ) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Staff).await?;
        if ctx.user_id == user_id {
            return Err(Error::Validation("cannot ban yourself".to_string()));
        }

        let target = self.get_profile(user_id).await?;
        if target.role.is_staff() && !ctx.is_admin() {
            return Err(Error::Unauthorized(
                "only admins may ban staff".to_string(),
            ));
        }

        self.store.set_banned(user_id, banned).await?;
        info!("User {} banned={} by {}", user_id, banned, ctx.user_id);
        self.revalidator.invalidate(views::profiles());
        Ok(())
    }

    /// Change a user's role (admin, not on oneself)
    pub async fn set_role(&self, caller: Option<&Caller>, user_id: Uuid, role: Role) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        if ctx.user_id == user_id {
            return Err(Error::Validation("cannot change your own role".to_string()));
        }

        if !self.store.set_role(user_id, role).await? {
            return Err(Error::NotFound(format!("Profile {} not found", user_id)));
        }
        info!("User {} is now {} (by {})", user_id, role.as_str(), ctx.user_id);
        self.revalidator.invalidate(views::profiles());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::Harness;

    #[tokio::test]
    async fn test_moderator_bans_and_unbans_member() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let member = h.member(0.0).await;

        h.service
            .set_ban(Some(&moderator), member.user_id, true)
            .await
            .unwrap();
        assert!(h.store.profile(member.user_id).await.unwrap().is_banned);

        h.service
            .set_ban(Some(&moderator), member.user_id, false)
            .await
            .unwrap();
        assert!(!h.store.profile(member.user_id).await.unwrap().is_banned);
    }

    #[tokio::test]
    async fn test_moderator_cannot_ban_staff_or_self() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let admin = h.admin().await;

        let err = h
            .service
            .set_ban(Some(&moderator), admin.user_id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let err = h
            .service
            .set_ban(Some(&moderator), moderator.user_id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        h.service
            .set_ban(Some(&admin), moderator.user_id, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_member_cannot_ban() {
        let h = Harness::new().await;
        let member = h.member(0.0).await;
        let other = h.member(0.0).await;

        let err = h
            .service
            .set_ban(Some(&member), other.user_id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert!(!h.store.profile(other.user_id).await.unwrap().is_banned);
    }

    #[tokio::test]
    async fn test_admin_promotes_member() {
        let h = Harness::new().await;
        let admin = h.admin().await;
        let member = h.member(0.0).await;

        h.service
            .set_role(Some(&admin), member.user_id, Role::Moderator)
            .await
            .unwrap();
        assert_eq!(
            h.store.profile(member.user_id).await.unwrap().role,
            Role::Moderator
        );

        let err = h
            .service
            .set_role(Some(&admin), admin.user_id, Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_profiles_requires_staff() {
        let h = Harness::new().await;
        let member = h.member(5.0).await;
        let moderator = h.moderator().await;

        assert!(h.service.list_profiles(Some(&member)).await.is_err());
        let profiles = h.service.list_profiles(Some(&moderator)).await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, member.user_id);
    }
}

//! Item submission and the simpler status paths

use common::models::{Item, ItemStatus, NewItem, SettingsSnapshot};
use common::{Error, Result};
use db::{CategoryStore, ItemStore};
use tracing::info;
use uuid::Uuid;

use crate::guard::{Access, Caller};
use crate::validate::{optional_text, required_text};
use crate::{views, ModerationService};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;

/// Settings key: whether signed-out visitors may list items
pub const ALLOW_GUEST_SUBMISSIONS: &str = "allow_guest_submissions";

impl ModerationService {
    /// List a new item as `pending`. Guests are allowed unless disabled in settings.
    pub async fn submit_item(
        &self,
        settings: &SettingsSnapshot,
        caller: Option<&Caller>,
        item: NewItem,
    ) -> Result<Item> {
        let owner = match caller {
            Some(_) => Some(self.guard.require_member(caller).await?.id),
            None if settings.get_bool(ALLOW_GUEST_SUBMISSIONS, true) => None,
            None => {
                return Err(Error::Unauthorized(
                    "guest submissions are disabled".to_string(),
                ))
            }
        };

        let item = NewItem {
            title: required_text("title", &item.title, MAX_TITLE_LEN)?,
            description: optional_text(
                "description",
                item.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
            category_id: item.category_id,
            sub_category_id: item.sub_category_id,
        };

        if let Some(category_id) = item.category_id {
            if self.store.get_category(category_id).await?.is_none() {
                return Err(Error::Validation(format!(
                    "unknown category {}",
                    category_id
                )));
            }
        }

        if let Some(sub_category_id) = item.sub_category_id {
            let Some(category_id) = item.category_id else {
                return Err(Error::Validation(
                    "sub-category given without a category".to_string(),
                ));
            };
            match self.store.get_sub_category(sub_category_id).await? {
                Some(sub) if sub.category_id == category_id => {}
                Some(_) => {
                    return Err(Error::Validation(format!(
                        "sub-category {} does not belong to category {}",
                        sub_category_id, category_id
                    )))
                }
                None => {
                    return Err(Error::Validation(format!(
                        "unknown sub-category {}",
                        sub_category_id
                    )))
                }
            }
        }

        let created = self.store.insert_item(owner, &item).await?;
        info!(
            "Item {} submitted by {}",
            created.id,
            owner.map_or_else(|| "guest".to_string(), |id| id.to_string())
        );

        self.revalidator.invalidate(views::item(created.id));
        Ok(created)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<Item> {
        self.store
            .get_item(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Item {} not found", id)))
    }

    /// Every matching row, newest first
    pub async fn list_items(&self, status: Option<ItemStatus>) -> Result<Vec<Item>> {
        self.store.list_items(status).await
    }

    /// Flip the urgency flag (staff), returning the new value
    pub async fn toggle_urgent(&self, caller: Option<&Caller>, item_id: Uuid) -> Result<bool> {
        let ctx = self.guard.require(caller, Access::Staff).await?;

        let urgent = self
            .store
            .toggle_item_urgent(item_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Item {} not found", item_id)))?;

        info!("Item {} urgent={} by {}", item_id, urgent, ctx.user_id);
        self.revalidator.invalidate(views::item(item_id));
        Ok(urgent)
    }

    /// Owner or staff marks an active item as handed over
    pub async fn mark_donated(&self, caller: Option<&Caller>, item_id: Uuid) -> Result<()> {
        let item = self.owned_or_staff(caller, item_id).await?;
        if item.status != ItemStatus::Active {
            return Err(Error::Validation(format!(
                "only active items can be donated (item is {})",
                item.status
            )));
        }

        self.write_status(item_id, ItemStatus::Donated).await
    }

    /// Owner or staff hides an item; the row is kept
    pub async fn soft_delete_item(&self, caller: Option<&Caller>, item_id: Uuid) -> Result<()> {
        self.owned_or_staff(caller, item_id).await?;
        self.write_status(item_id, ItemStatus::Deleted).await
    }

    /// Remove the row entirely (admin)
    pub async fn hard_delete_item(&self, caller: Option<&Caller>, item_id: Uuid) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Admin).await?;

        if !self.store.delete_item(item_id).await? {
            return Err(Error::NotFound(format!("Item {} not found", item_id)));
        }

        info!("Item {} deleted by admin {}", item_id, ctx.user_id);
        self.revalidator.invalidate(views::item(item_id));
        Ok(())
    }

    async fn owned_or_staff(&self, caller: Option<&Caller>, item_id: Uuid) -> Result<Item> {
        let profile = self.guard.require_member(caller).await?;
        let item = self.get_item(item_id).await?;

        if item.owner_user_id != Some(profile.id) && !profile.role.is_staff() {
            return Err(Error::Unauthorized(
                "only the owner or staff may change this item".to_string(),
            ));
        }
        Ok(item)
    }

    async fn write_status(&self, item_id: Uuid, status: ItemStatus) -> Result<()> {
        if !self.store.set_item_status(item_id, status, None).await? {
            return Err(Error::NotFound(format!("Item {} not found", item_id)));
        }
        info!("Item {} set to {}", item_id, status);
        self.revalidator.invalidate(views::item(item_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::Harness;
    use common::models::Setting;

    fn coat() -> NewItem {
        NewItem {
            title: "  Winter coat ".to_string(),
            description: Some("Size M, barely worn".to_string()),
            category_id: None,
            sub_category_id: None,
        }
    }

    fn guests_disabled() -> SettingsSnapshot {
        SettingsSnapshot::from_settings(vec![Setting {
            key: ALLOW_GUEST_SUBMISSIONS.to_string(),
            value: serde_json::json!(false),
            updated_at: chrono::Utc::now(),
        }])
    }

    #[tokio::test]
    async fn test_member_submission_is_pending_and_owned() {
        let h = Harness::new().await;
        let member = h.member(0.0).await;

        let item = h
            .service
            .submit_item(&SettingsSnapshot::default(), Some(&member), coat())
            .await
            .unwrap();

        assert_eq!(item.title, "Winter coat");
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.owner_user_id, Some(member.user_id));
        assert!(!item.upload_points_awarded);
    }

    #[tokio::test]
    async fn test_guest_submission_respects_setting() {
        let h = Harness::new().await;

        let item = h
            .service
            .submit_item(&SettingsSnapshot::default(), None, coat())
            .await
            .unwrap();
        assert_eq!(item.owner_user_id, None);

        let err = h
            .service
            .submit_item(&guests_disabled(), None, coat())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_submission_validation() {
        let h = Harness::new().await;
        let settings = SettingsSnapshot::default();

        let mut blank = coat();
        blank.title = "   ".to_string();
        let err = h.service.submit_item(&settings, None, blank).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let mut unknown_category = coat();
        unknown_category.category_id = Some(Uuid::new_v4());
        let err = h
            .service
            .submit_item(&settings, None, unknown_category)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_sub_category_must_exist_and_match_category() {
        let h = Harness::new().await;
        let admin = h.admin().await;
        let settings = SettingsSnapshot::default();
        let clothing = h.service.create_category(Some(&admin), "Clothing").await.unwrap();
        let furniture = h.service.create_category(Some(&admin), "Furniture").await.unwrap();
        let coats = h
            .service
            .create_sub_category(Some(&admin), clothing.id, "Coats")
            .await
            .unwrap();

        let rejected = [
            (Some(clothing.id), Some(Uuid::new_v4())),
            (Some(furniture.id), Some(coats.id)),
            (None, Some(coats.id)),
        ];
        for (category_id, sub_category_id) in rejected {
            let mut item = coat();
            item.category_id = category_id;
            item.sub_category_id = sub_category_id;
            let err = h
                .service
                .submit_item(&settings, None, item)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(h.service.list_items(None).await.unwrap().is_empty());

        let mut item = coat();
        item.category_id = Some(clothing.id);
        item.sub_category_id = Some(coats.id);
        let created = h.service.submit_item(&settings, None, item).await.unwrap();
        assert_eq!(created.sub_category_id, Some(coats.id));
    }

    #[tokio::test]
    async fn test_banned_member_cannot_submit() {
        let h = Harness::new().await;
        let admin = h.admin().await;
        let member = h.member(0.0).await;
        h.service
            .set_ban(Some(&admin), member.user_id, true)
            .await
            .unwrap();

        let err = h
            .service
            .submit_item(&SettingsSnapshot::default(), Some(&member), coat())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_toggle_urgent_flips_and_requires_staff() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let member = h.member(0.0).await;
        let item = h.store.add_item(Some(member.user_id), false).await;

        assert!(h.service.toggle_urgent(Some(&moderator), item.id).await.unwrap());
        assert!(!h.service.toggle_urgent(Some(&moderator), item.id).await.unwrap());

        let err = h
            .service
            .toggle_urgent(Some(&member), item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_owner_marks_active_item_donated() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let owner = h.member(0.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;

        let err = h
            .service
            .mark_donated(Some(&owner), item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        h.service.approve_item(Some(&moderator), item.id).await.unwrap();
        h.service.mark_donated(Some(&owner), item.id).await.unwrap();

        assert_eq!(
            h.store.item(item.id).await.unwrap().status,
            ItemStatus::Donated
        );
    }

    #[tokio::test]
    async fn test_soft_delete_by_stranger_is_rejected() {
        let h = Harness::new().await;
        let owner = h.member(0.0).await;
        let stranger = h.member(0.0).await;
        let item = h.store.add_item(Some(owner.user_id), false).await;

        let err = h
            .service
            .soft_delete_item(Some(&stranger), item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        h.service
            .soft_delete_item(Some(&owner), item.id)
            .await
            .unwrap();
        assert_eq!(
            h.store.item(item.id).await.unwrap().status,
            ItemStatus::Deleted
        );
    }

    #[tokio::test]
    async fn test_hard_delete_is_admin_only() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let admin = h.admin().await;
        let item = h.store.add_item(None, false).await;

        let err = h
            .service
            .hard_delete_item(Some(&moderator), item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        h.service.hard_delete_item(Some(&admin), item.id).await.unwrap();
        assert!(h.store.item(item.id).await.is_none());

        let err = h
            .service
            .hard_delete_item(Some(&admin), item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_items_filters_by_status() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;
        let approved = h.store.add_item(None, false).await;
        h.store.add_item(None, false).await;
        h.service.approve_item(Some(&moderator), approved.id).await.unwrap();

        let active = h.service.list_items(Some(ItemStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, approved.id);
        assert_eq!(h.service.list_items(None).await.unwrap().len(), 2);
    }
}

//! Item approval and rejection

use common::models::{ItemStatus, ModerationStatus};
use common::{Error, Result};
use db::ItemStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::awards::AwardOutcome;
use crate::guard::{Access, Caller};
use crate::validate::optional_text;
use crate::{views, ModerationService};

const MAX_REASON_LEN: usize = 1000;

impl ModerationService {
    /// Move an item to `active` or `rejected`.
    ///
    /// The reason is stored only for a rejection, and only when one is supplied;
    /// otherwise any earlier reason stays as it was. Activation triggers the upload
    /// award, whose failure is logged and never returned.
    pub async fn set_item_status(
        &self,
        caller: Option<&Caller>,
        item_id: Uuid,
        status: ModerationStatus,
        rejection_reason: Option<&str>,
    ) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Staff).await?;

        let reason = match status {
            ModerationStatus::Rejected => {
                optional_text("rejection reason", rejection_reason, MAX_REASON_LEN)?
            }
            ModerationStatus::Active => None,
        };

        let target = ItemStatus::from(status);
        let found = self
            .store
            .set_item_status(item_id, target, reason.as_deref())
            .await?;
        if !found {
            return Err(Error::NotFound(format!("Item {} not found", item_id)));
        }

        info!("Item {} set to {} by {}", item_id, target, ctx.user_id);

        if status == ModerationStatus::Active {
            match self.awarder.award_upload_points(item_id).await {
                Ok(AwardOutcome::Awarded {
                    owner_user_id,
                    amount,
                }) => debug!("Item {} paid {} to {}", item_id, amount, owner_user_id),
                Ok(outcome) => debug!("Item {} award outcome: {:?}", item_id, outcome),
                Err(e) => warn!("Upload award for item {} failed: {}", item_id, e),
            }
        }

        self.revalidator.invalidate(views::item(item_id));
        Ok(())
    }

    pub async fn approve_item(&self, caller: Option<&Caller>, item_id: Uuid) -> Result<()> {
        self.set_item_status(caller, item_id, ModerationStatus::Active, None)
            .await
    }

    pub async fn reject_item(
        &self,
        caller: Option<&Caller>,
        item_id: Uuid,
        reason: Option<&str>,
    ) -> Result<()> {
        self.set_item_status(caller, item_id, ModerationStatus::Rejected, reason)
            .await
    }
}

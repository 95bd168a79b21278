//! Community help appeals

use common::models::{Appeal, AppealStatus, AppealUpdate, NewAppeal, SettingsSnapshot};
use common::{Error, Result};
use db::AppealStore;
use tracing::info;
use uuid::Uuid;

use crate::guard::{Access, Caller};
use crate::validate::{optional_text, required_text};
use crate::{views, ModerationService};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_REASON_LEN: usize = 1000;

/// Settings key: whether new appeals are accepted at all
pub const APPEALS_OPEN: &str = "appeals_open";

impl ModerationService {
    /// Submit an appeal as `pending`; signed-in callers become its owner
    pub async fn create_appeal(
        &self,
        settings: &SettingsSnapshot,
        caller: Option<&Caller>,
        appeal: NewAppeal,
    ) -> Result<Appeal> {
        if !settings.get_bool(APPEALS_OPEN, true) {
            return Err(Error::Validation("appeals are closed".to_string()));
        }

        let owner = match caller {
            Some(_) => Some(self.guard.require_member(caller).await?.id),
            None => None,
        };

        let appeal = NewAppeal {
            title: required_text("title", &appeal.title, MAX_TITLE_LEN)?,
            description: optional_text(
                "description",
                appeal.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
        };

        let created = self.store.insert_appeal(owner, &appeal).await?;
        info!("Appeal {} created", created.id);
        self.revalidator.invalidate(views::appeal(created.id));
        Ok(created)
    }

    pub async fn get_appeal(&self, id: Uuid) -> Result<Appeal> {
        self.store
            .get_appeal(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Appeal {} not found", id)))
    }

    /// Urgent first, then newest
    pub async fn list_appeals(&self, status: Option<AppealStatus>) -> Result<Vec<Appeal>> {
        self.store.list_appeals(status).await
    }

    /// Partial edit (staff). A blank title or description counts as absent and
    /// leaves the stored value as it was; descriptions are never cleared here.
    pub async fn update_appeal(
        &self,
        caller: Option<&Caller>,
        id: Uuid,
        changes: AppealUpdate,
    ) -> Result<Appeal> {
        let ctx = self.guard.require(caller, Access::Staff).await?;

        let changes = AppealUpdate {
            title: changes
                .title
                .as_deref()
                .map(|t| required_text("title", t, MAX_TITLE_LEN))
                .transpose()?,
            description: optional_text(
                "description",
                changes.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
            is_urgent: changes.is_urgent,
        };

        let appeal = self
            .store
            .update_appeal(id, &changes)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Appeal {} not found", id)))?;

        info!("Appeal {} updated by {}", id, ctx.user_id);
        self.revalidator.invalidate(views::appeal(id));
        Ok(appeal)
    }

    /// Same reason rule as items: stored only on rejection, only when given
    pub async fn set_appeal_status(
        &self,
        caller: Option<&Caller>,
        id: Uuid,
        status: AppealStatus,
        rejection_reason: Option<&str>,
    ) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Staff).await?;

        let reason = match status {
            AppealStatus::Rejected => {
                optional_text("rejection reason", rejection_reason, MAX_REASON_LEN)?
            }
            _ => None,
        };

        if !self
            .store
            .set_appeal_status(id, status, reason.as_deref())
            .await?
        {
            return Err(Error::NotFound(format!("Appeal {} not found", id)));
        }

        info!("Appeal {} set to {} by {}", id, status.as_str(), ctx.user_id);
        self.revalidator.invalidate(views::appeal(id));
        Ok(())
    }

    pub async fn delete_appeal(&self, caller: Option<&Caller>, id: Uuid) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Staff).await?;

        if !self.store.delete_appeal(id).await? {
            return Err(Error::NotFound(format!("Appeal {} not found", id)));
        }
        info!("Appeal {} deleted by {}", id, ctx.user_id);
        self.revalidator.invalidate(views::appeal(id));
        Ok(())
    }
}

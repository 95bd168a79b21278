//! Point ledger: configured rewards and balance changes

use std::sync::Arc;

use common::models::{PointValue, Profile};
use common::{Error, Result};
use db::{PointStore, ProfileStore, Store};
use tracing::info;
use uuid::Uuid;

use crate::guard::{Access, Caller};
use crate::validate::config_key;
use crate::{views, ModerationService};

/// Reads point values and applies atomic increments
#[derive(Clone)]
pub struct PointLedger {
    store: Arc<dyn Store>,
}

impl PointLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Configured reward for `key`, or `default` when unconfigured
    pub async fn get_point_value(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.store.point_value(key).await?.unwrap_or(default))
    }

    /// Server-side `points += amount`, returning the new balance
    pub async fn increment_points(&self, user_id: Uuid, amount: f64) -> Result<f64> {
        self.store.increment_points(user_id, amount).await
    }
}

fn check_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation(
            "points must be a non-negative number".to_string(),
        ));
    }
    Ok(amount)
}

impl ModerationService {
    pub async fn list_point_values(&self) -> Result<Vec<PointValue>> {
        self.store.list_point_values().await
    }

    /// Set the reward for an action key (admin). Already-awarded items are unaffected.
    pub async fn upsert_point_value(
        &self,
        caller: Option<&Caller>,
        key: &str,
        points: f64,
    ) -> Result<PointValue> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let key = config_key(key)?;
        let points = check_amount(points)?;

        let value = self.store.upsert_point_value(&key, points).await?;
        info!("Point value {} set to {} by {}", key, points, ctx.user_id);
        self.revalidator.invalidate(views::point_values());
        Ok(value)
    }

    /// Grant points to a user by hand (admin)
    pub async fn award_points(
        &self,
        caller: Option<&Caller>,
        user_id: Uuid,
        amount: f64,
    ) -> Result<f64> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let amount = check_amount(amount)?;
        if amount == 0.0 {
            return Err(Error::Validation("amount must be positive".to_string()));
        }

        let balance = self.ledger.increment_points(user_id, amount).await?;
        info!(
            "Admin {} awarded {} points to {} (balance {})",
            ctx.user_id, amount, user_id, balance
        );
        self.revalidator.invalidate(views::profiles());
        Ok(balance)
    }

    /// Overwrite a balance after manual reconciliation (admin)
    pub async fn correct_points(
        &self,
        caller: Option<&Caller>,
        user_id: Uuid,
        points: f64,
    ) -> Result<Profile> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let points = check_amount(points)?;

        if !self.store.set_points(user_id, points).await? {
            return Err(Error::NotFound(format!("Profile {} not found", user_id)));
        }
        info!("Admin {} corrected balance of {} to {}", ctx.user_id, user_id, points);
        self.revalidator.invalidate(views::profiles());

        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Profile {} not found", user_id)))
    }
}

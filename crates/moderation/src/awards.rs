//! One-time upload reward paid when an item is first approved
//!
//! The award is advisory: [`PointAwarder::award_upload_points`] returns a typed
//! result that the status transition logs and drops. Nothing here can fail an
//! approval.

use std::sync::Arc;

use common::models::actions;
use db::{ItemStore, PointStore, Store};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ledger::PointLedger;

/// What the award flow did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AwardOutcome {
    /// Owner paid and the item marked as awarded
    Awarded { owner_user_id: Uuid, amount: f64 },
    /// Reward resolved to zero; the item is still marked so a later reward change
    /// does not pay out for it
    MarkedWithoutPoints { owner_user_id: Uuid },
    AlreadyAwarded,
    /// Guest submission, nobody to pay
    GuestItem,
}

#[derive(Error, Debug)]
pub enum AwardError {
    #[error("could not read item {item_id}: {source}")]
    ItemLookup {
        item_id: Uuid,
        #[source]
        source: common::Error,
    },
    #[error("item {0} not found")]
    ItemMissing(Uuid),
    #[error("could not pay {amount} points to {owner_user_id} for item {item_id}: {source}")]
    Increment {
        item_id: Uuid,
        owner_user_id: Uuid,
        amount: f64,
        #[source]
        source: common::Error,
    },
}

/// Pays the `upload_item` reward at most once per item
#[derive(Clone)]
pub struct PointAwarder {
    store: Arc<dyn Store>,
    ledger: PointLedger,
}

impl PointAwarder {
    pub fn new(store: Arc<dyn Store>, ledger: PointLedger) -> Self {
        Self { store, ledger }
    }

    pub async fn award_upload_points(&self, item_id: Uuid) -> Result<AwardOutcome, AwardError> {
        // 1. owner and flag
        let state = self
            .store
            .item_award_state(item_id)
            .await
            .map_err(|source| AwardError::ItemLookup { item_id, source })?
            .ok_or(AwardError::ItemMissing(item_id))?;

        let Some(owner_user_id) = state.owner_user_id else {
            debug!("Item {} is a guest submission, no upload points", item_id);
            return Ok(AwardOutcome::GuestItem);
        };

        // 2. idempotency short-circuit
        if state.upload_points_awarded {
            debug!("Upload points for item {} already awarded", item_id);
            return Ok(AwardOutcome::AlreadyAwarded);
        }

        // 3. configured reward; an unreadable value counts as zero
        let amount = match self.ledger.get_point_value(actions::UPLOAD_ITEM, 0.0).await {
            Ok(points) => points,
            Err(e) => {
                warn!(
                    "Could not read '{}' point value, treating as 0: {}",
                    actions::UPLOAD_ITEM,
                    e
                );
                0.0
            }
        };

        // 4 + 5. pay and set the flag in one conditional write
        let claimed = self
            .store
            .award_item_points(item_id, owner_user_id, amount)
            .await
            .map_err(|source| AwardError::Increment {
                item_id,
                owner_user_id,
                amount,
                source,
            })?;

        if !claimed {
            debug!("Lost award race for item {}", item_id);
            return Ok(AwardOutcome::AlreadyAwarded);
        }

        if amount > 0.0 {
            info!(
                "Awarded {} upload points to {} for item {}",
                amount, owner_user_id, item_id
            );
            Ok(AwardOutcome::Awarded {
                owner_user_id,
                amount,
            })
        } else {
            info!(
                "Item {} marked as awarded without points (reward is 0)",
                item_id
            );
            Ok(AwardOutcome::MarkedWithoutPoints { owner_user_id })
        }
    }
}

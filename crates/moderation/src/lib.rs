//! Moderation handlers: status transitions, point awards and the admin surfaces

use std::sync::Arc;

use db::Store;
use revalidate::Revalidator;

pub mod appeals;
pub mod awards;
pub mod categories;
pub mod guard;
pub mod items;
pub mod ledger;
pub mod settings;
pub mod transitions;
pub mod users;
mod validate;
pub mod views;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod transitions_test;

pub use awards::{AwardError, AwardOutcome, PointAwarder};
pub use guard::{Access, Caller, Guard, StaffContext};
pub use ledger::PointLedger;

/// Entry point for every mutating operation exposed to the UI layer
pub struct ModerationService {
    store: Arc<dyn Store>,
    revalidator: Arc<dyn Revalidator>,
    guard: Guard,
    ledger: PointLedger,
    awarder: PointAwarder,
}

impl ModerationService {
    pub fn new(store: Arc<dyn Store>, revalidator: Arc<dyn Revalidator>) -> Self {
        let ledger = PointLedger::new(store.clone());
        Self {
            guard: Guard::new(store.clone()),
            awarder: PointAwarder::new(store.clone(), ledger.clone()),
            ledger,
            store,
            revalidator,
        }
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn ledger(&self) -> &PointLedger {
        &self.ledger
    }
}

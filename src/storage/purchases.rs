//! Purchase repository
//!
//! Purchases are stored in purchases.json.

use crate::audit::EntityType;
use crate::clock::Clock;
use crate::error::BackofficeResult;
use crate::models::{DateWindow, Purchase, PurchaseId};

use super::collection::{JsonCollection, Record};

impl Record for Purchase {
    type Id = PurchaseId;
    const ENTITY: EntityType = EntityType::Purchase;

    fn id(&self) -> PurchaseId {
        self.id
    }

    fn set_id(&mut self, id: PurchaseId) {
        self.id = id;
    }

    fn label(&self) -> String {
        if self.invoice_number.is_empty() {
            self.supplier.clone()
        } else {
            format!("{} NF {}", self.supplier, self.invoice_number)
        }
    }
}

/// Repository for purchase persistence
pub type PurchaseRepository = JsonCollection<Purchase>;

impl JsonCollection<Purchase> {
    /// Purchases whose local date falls inside the window
    pub fn in_window(&self, window: &DateWindow, clock: &dyn Clock) -> BackofficeResult<Vec<Purchase>> {
        self.filter(|p| window.contains(clock.to_local(p.date)))
    }
}

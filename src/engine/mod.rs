mod availability;
mod error;
mod ledger;
mod mutations;
mod pricing;
mod queries;
mod snapshot;

pub use availability::{aggregate_demand, compute_availability, overlaps, reconcile};
pub use error::EngineError;
pub use ledger::ReservationLedger;
pub use pricing::price;

use crate::auth::AdminDirectory;
use crate::model::*;

/// Everything one session works with: stock, the reservation ledger, the
/// administrator list, and the reservation currently being drafted.
///
/// Availability is never stored here. Every read recomputes it from
/// `inventory`, `ledger` and the draft's dates.
pub struct Engine {
    inventory: Vec<InventoryItem>,
    ledger: ReservationLedger,
    admins: AdminDirectory,
    draft: Draft,
    vat_rate: f64,
}

impl Engine {
    pub fn new(
        inventory: Vec<InventoryItem>,
        ledger: ReservationLedger,
        admins: AdminDirectory,
        vat_rate: f64,
    ) -> Self {
        Self {
            inventory,
            ledger,
            admins,
            draft: Draft::default(),
            vat_rate,
        }
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    pub fn admins(&self) -> &AdminDirectory {
        &self.admins
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn vat_rate(&self) -> f64 {
        self.vat_rate
    }

    pub fn get_item(&self, id: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id == id)
    }

    /// Recompute availability and clamp the draft cart to it.
    fn reconcile_draft(&mut self) -> Adjustment {
        let view = self.availability();
        let (cart, changed) = reconcile(&self.draft.cart, &view);
        if changed {
            tracing::warn!(
                "cart quantities adjusted to availability for {:?}",
                self.draft.candidate().range().map(|r| r.to_string())
            );
            metrics::counter!(crate::observability::CART_ADJUSTMENTS_TOTAL).increment(1);
            self.draft.cart = cart.clone();
        }
        Adjustment { changed, cart }
    }
}

/// Stock offered when no inventory has been saved yet.
pub fn default_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: "event-chairs".into(),
            name: "Event Chairs".into(),
            category: Category::Furniture,
            total_quantity: 100,
            unit_price: 1.0,
            unit: "per event".into(),
            image_url: None,
        },
        InventoryItem {
            id: "rectangular-tables".into(),
            name: "Rectangular Tables".into(),
            category: Category::Furniture,
            total_quantity: 20,
            unit_price: 5.0,
            unit: "per event".into(),
            image_url: None,
        },
    ]
}

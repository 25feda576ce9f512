use crate::model::*;

use super::availability::compute_availability;
use super::pricing::price;
use super::Engine;

impl Engine {
    /// Free quantity of every item for the draft's current dates.
    pub fn availability(&self) -> Vec<ItemAvailability> {
        self.availability_for(&self.draft.candidate())
    }

    pub fn availability_for(&self, candidate: &CandidateRange) -> Vec<ItemAvailability> {
        compute_availability(&self.inventory, self.ledger.all(), candidate)
    }

    pub fn available_quantity(&self, item_id: &str) -> Option<u32> {
        self.availability()
            .into_iter()
            .find(|a| a.item.id == item_id)
            .map(|a| a.available_quantity)
    }

    /// Price of the draft cart.
    pub fn quote(&self) -> Quote {
        price(&self.draft.cart, &self.inventory, self.vat_rate)
    }

    pub fn reservations_with_status(&self, status: ReservationStatus) -> Vec<&ConfirmedReservation> {
        self.ledger
            .all()
            .iter()
            .filter(|r| r.status == status)
            .collect()
    }
}

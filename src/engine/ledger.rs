use chrono::Utc;
use ulid::Ulid;

use crate::limits::MAX_RESERVATIONS;
use crate::model::*;

use super::EngineError;

/// Every reservation ever submitted, in submission order.
///
/// Entries are never removed. Only `status` changes after `append`.
#[derive(Debug, Clone, Default)]
pub struct ReservationLedger {
    entries: Vec<ConfirmedReservation>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ConfirmedReservation>) -> Self {
        Self { entries }
    }

    /// Record a submission as `Pending` under a fresh id.
    pub fn append(
        &mut self,
        customer: Customer,
        range: DateRange,
        cart: Cart,
        total: f64,
    ) -> Result<ConfirmedReservation, EngineError> {
        if self.entries.len() >= MAX_RESERVATIONS {
            return Err(EngineError::LimitExceeded("too many reservations"));
        }
        let entry = ConfirmedReservation {
            id: Ulid::new(),
            customer,
            range,
            cart,
            total,
            status: ReservationStatus::Pending,
            submitted_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Returns the previous status.
    pub fn set_status(&mut self, id: Ulid, status: ReservationStatus) -> Result<ReservationStatus, EngineError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EngineError::NotFound(id))?;
        let previous = entry.status;
        entry.status = status;
        Ok(previous)
    }

    pub fn get(&self, id: &Ulid) -> Option<&ConfirmedReservation> {
        self.entries.iter().find(|r| r.id == *id)
    }

    pub fn all(&self) -> &[ConfirmedReservation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn cart(qty: u32) -> Cart {
        [("chairs".to_string(), qty)].into_iter().collect()
    }

    #[test]
    fn append_starts_pending() {
        let mut ledger = ReservationLedger::new();
        let entry = ledger
            .append(Customer::default(), DateRange::new(june(1), june(3)), cart(40), 48.4)
            .unwrap();
        assert_eq!(entry.status, ReservationStatus::Pending);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&entry.id), Some(&entry));
    }

    #[test]
    fn append_assigns_distinct_ids() {
        let mut ledger = ReservationLedger::new();
        let a = ledger
            .append(Customer::default(), DateRange::new(june(1), june(1)), cart(1), 1.0)
            .unwrap();
        let b = ledger
            .append(Customer::default(), DateRange::new(june(1), june(1)), cart(1), 1.0)
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn set_status_updates_only_status() {
        let mut ledger = ReservationLedger::new();
        let entry = ledger
            .append(Customer::default(), DateRange::new(june(1), june(3)), cart(40), 48.4)
            .unwrap();
        let previous = ledger.set_status(entry.id, ReservationStatus::Validated).unwrap();
        assert_eq!(previous, ReservationStatus::Pending);

        let stored = ledger.get(&entry.id).unwrap();
        assert_eq!(stored.status, ReservationStatus::Validated);
        assert_eq!(stored.cart, entry.cart);
        assert_eq!(stored.range, entry.range);
    }

    #[test]
    fn set_status_unknown_id() {
        let mut ledger = ReservationLedger::new();
        let missing = Ulid::new();
        let result = ledger.set_status(missing, ReservationStatus::Rejected);
        assert!(matches!(result, Err(EngineError::NotFound(id)) if id == missing));
    }

    #[test]
    fn rejected_entries_stay_in_ledger() {
        let mut ledger = ReservationLedger::new();
        let entry = ledger
            .append(Customer::default(), DateRange::new(june(1), june(3)), cart(40), 48.4)
            .unwrap();
        ledger.set_status(entry.id, ReservationStatus::Rejected).unwrap();
        assert_eq!(ledger.all().len(), 1);
        assert!(!ledger.all()[0].counts_as_demand());
    }
}

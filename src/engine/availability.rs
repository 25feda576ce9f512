use std::collections::HashMap;

use crate::model::*;

// ── Availability Algorithm ────────────────────────────────────────

/// Closed-interval overlap test. Back-to-back ranges (one ends the day the
/// other starts) count as overlapping: there is no turnover day.
pub fn overlaps(a: &DateRange, b: &DateRange) -> bool {
    a.overlaps(b)
}

/// Sum, per item id, the quantities committed by validated reservations whose
/// range overlaps `range`. Pending and rejected entries are ignored.
pub fn aggregate_demand(range: &DateRange, ledger: &[ConfirmedReservation]) -> HashMap<String, u64> {
    let mut reserved: HashMap<String, u64> = HashMap::new();
    for entry in ledger
        .iter()
        .filter(|r| r.counts_as_demand() && overlaps(range, &r.range))
    {
        for (item_id, qty) in &entry.cart {
            *reserved.entry(item_id.clone()).or_insert(0) += u64::from(*qty);
        }
    }
    reserved
}

/// Free quantity of every inventory item for the candidate range.
///
/// `Unconstrained` means no dates have been chosen (or they could not be
/// parsed): every item reports its full stock. Over-committed items clamp to 0.
pub fn compute_availability(
    inventory: &[InventoryItem],
    ledger: &[ConfirmedReservation],
    candidate: &CandidateRange,
) -> Vec<ItemAvailability> {
    let Some(range) = candidate.range() else {
        return inventory
            .iter()
            .map(|item| ItemAvailability {
                item: item.clone(),
                available_quantity: item.total_quantity,
            })
            .collect();
    };

    let reserved = aggregate_demand(&range, ledger);
    inventory
        .iter()
        .map(|item| {
            let taken = reserved.get(&item.id).copied().unwrap_or(0);
            let free = u64::from(item.total_quantity).saturating_sub(taken);
            ItemAvailability {
                item: item.clone(),
                // free <= total_quantity, so it fits back into u32
                available_quantity: free as u32,
            }
        })
        .collect()
}

/// Clamp every cart line that exceeds the item's free quantity.
///
/// Items without a cart line stay absent. Lines for items missing from the
/// view are left alone. Reconciling an already reconciled cart is a no-op.
pub fn reconcile(cart: &Cart, view: &[ItemAvailability]) -> (Cart, bool) {
    let mut next = cart.clone();
    let mut changed = false;
    for entry in view {
        if let Some(qty) = next.get_mut(&entry.item.id)
            && *qty > entry.available_quantity
        {
            *qty = entry.available_quantity;
            changed = true;
        }
    }
    (next, changed)
}

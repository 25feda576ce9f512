use crate::model::*;

/// Subtotal over inventory items in the cart, plus a flat VAT rate.
///
/// Cart lines for ids no longer in the inventory do not contribute.
pub fn price(cart: &Cart, inventory: &[InventoryItem], vat_rate: f64) -> Quote {
    let subtotal: f64 = inventory
        .iter()
        .map(|item| f64::from(cart.get(&item.id).copied().unwrap_or(0)) * item.unit_price)
        .sum();
    Quote {
        subtotal,
        total: subtotal + subtotal * vat_rate,
    }
}

use tracing::info;
use ulid::Ulid;

use crate::auth::AdminUserInfo;
use crate::limits::*;
use crate::model::*;

use super::{Engine, EngineError};

fn validate_item(item: &InventoryItem) -> Result<(), EngineError> {
    if item.name.trim().is_empty() || item.id.is_empty() {
        return Err(EngineError::InvalidItem("name is required"));
    }
    if item.name.len() > MAX_NAME_LEN {
        return Err(EngineError::LimitExceeded("item name too long"));
    }
    if item.unit.len() > MAX_LABEL_LEN {
        return Err(EngineError::LimitExceeded("unit label too long"));
    }
    if item.image_url.as_ref().is_some_and(|u| u.len() > MAX_URL_LEN) {
        return Err(EngineError::LimitExceeded("image url too long"));
    }
    if !item.unit_price.is_finite() || item.unit_price < 0.0 {
        return Err(EngineError::InvalidItem("unit price must be a non-negative number"));
    }
    if item.total_quantity > MAX_LINE_QUANTITY {
        return Err(EngineError::LimitExceeded("total quantity too large"));
    }
    Ok(())
}

fn validate_customer(customer: &Customer) -> Result<(), EngineError> {
    let fields = [
        &customer.first_name,
        &customer.last_name,
        &customer.phone,
        &customer.email,
        &customer.event_address,
    ];
    if fields.iter().any(|f| f.len() > MAX_CUSTOMER_FIELD_LEN) {
        return Err(EngineError::LimitExceeded("customer field too long"));
    }
    Ok(())
}

impl Engine {
    // ── Draft ────────────────────────────────────────────────

    /// Change the candidate dates and clamp the cart to the new availability.
    pub fn set_dates(&mut self, pickup: &str, return_date: &str) -> Adjustment {
        self.draft.pickup_date = pickup.trim().to_string();
        self.draft.return_date = return_date.trim().to_string();
        match self.draft.candidate() {
            CandidateRange::Constrained(range) => info!("candidate range set to {range}"),
            CandidateRange::Unconstrained => info!("candidate range cleared or unparsable"),
        }
        self.reconcile_draft()
    }

    pub fn set_customer(&mut self, customer: Customer) -> Result<(), EngineError> {
        validate_customer(&customer)?;
        self.draft.customer = customer;
        Ok(())
    }

    /// Set a cart line, capped at what is currently free. Returns the stored
    /// quantity; zero removes the line.
    pub fn set_cart_quantity(&mut self, item_id: &str, quantity: u32) -> Result<u32, EngineError> {
        let available = self
            .available_quantity(item_id)
            .ok_or_else(|| EngineError::UnknownItem(item_id.to_string()))?;
        let stored = quantity.min(available);
        if stored == 0 {
            self.draft.cart.remove(item_id);
        } else {
            self.draft.cart.insert(item_id.to_string(), stored);
        }
        if stored < quantity {
            info!("cart line {item_id} capped at {stored} (requested {quantity})");
        }
        Ok(stored)
    }

    pub fn remove_cart_line(&mut self, item_id: &str) -> bool {
        self.draft.cart.remove(item_id).is_some()
    }

    pub fn reset_draft(&mut self) {
        self.draft = Draft::default();
    }

    /// Turn the draft into a pending reservation and start a fresh draft.
    pub fn submit(&mut self) -> Result<ConfirmedReservation, EngineError> {
        if let Some(field) = self.draft.customer.missing_field() {
            return Err(EngineError::Incomplete(field));
        }
        if self.draft.pickup_date.is_empty() {
            return Err(EngineError::Incomplete("pickup_date"));
        }
        if self.draft.return_date.is_empty() {
            return Err(EngineError::Incomplete("return_date"));
        }
        let Some(range) = self.draft.candidate().range() else {
            return Err(EngineError::Incomplete("a valid date range"));
        };

        // Stale lines must not reach the ledger.
        self.reconcile_draft();
        let quote = self.quote();
        if quote.subtotal <= 0.0 {
            return Err(EngineError::Incomplete("cart"));
        }

        let cart: Cart = self
            .draft
            .cart
            .iter()
            .filter(|(_, q)| **q > 0)
            .map(|(k, q)| (k.clone(), *q))
            .collect();
        let entry = self
            .ledger
            .append(self.draft.customer.clone(), range, cart, quote.total)?;

        info!("reservation {} submitted for {range}, total {:.2}", entry.id, entry.total);
        metrics::counter!(crate::observability::RESERVATIONS_SUBMITTED_TOTAL).increment(1);
        metrics::gauge!(crate::observability::LEDGER_SIZE).set(self.ledger.len() as f64);
        self.reset_draft();
        Ok(entry)
    }

    // ── Administration ───────────────────────────────────────

    pub fn set_status(&mut self, id: Ulid, status: ReservationStatus) -> Result<Adjustment, EngineError> {
        let previous = self.ledger.set_status(id, status)?;
        info!("reservation {id}: {previous} -> {status}");
        metrics::counter!(crate::observability::STATUS_CHANGES_TOTAL, "status" => status.as_str())
            .increment(1);
        Ok(self.reconcile_draft())
    }

    pub fn add_item(&mut self, new_item: NewItem) -> Result<InventoryItem, EngineError> {
        if self.inventory.len() >= MAX_ITEMS {
            return Err(EngineError::LimitExceeded("too many items"));
        }
        let item = new_item.into_item();
        validate_item(&item)?;
        if self.get_item(&item.id).is_some() {
            return Err(EngineError::DuplicateKey(item.id));
        }
        info!("item {} added with {} in stock", item.id, item.total_quantity);
        self.inventory.push(item.clone());
        metrics::gauge!(crate::observability::INVENTORY_ITEMS).set(self.inventory.len() as f64);
        Ok(item)
    }

    /// Replace an item's fields. Existing reservations are not touched; the
    /// draft cart is clamped if stock went down.
    pub fn update_item(&mut self, item: InventoryItem) -> Result<Adjustment, EngineError> {
        validate_item(&item)?;
        let slot = self
            .inventory
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| EngineError::UnknownItem(item.id.clone()))?;
        info!("item {} updated", item.id);
        *slot = item;
        Ok(self.reconcile_draft())
    }

    pub fn delete_item(&mut self, id: &str) -> Result<(), EngineError> {
        let pos = self
            .inventory
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| EngineError::UnknownItem(id.to_string()))?;
        self.inventory.remove(pos);
        self.draft.cart.remove(id);
        info!("item {id} deleted");
        metrics::gauge!(crate::observability::INVENTORY_ITEMS).set(self.inventory.len() as f64);
        Ok(())
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AdminUserInfo, EngineError> {
        match self.admins.authenticate(email, password) {
            Ok(user) => {
                info!("admin {} logged in", user.email);
                Ok(user)
            }
            Err(e) => {
                metrics::counter!(crate::observability::AUTH_FAILURES_TOTAL).increment(1);
                tracing::warn!("login failed: {e}");
                Err(e)
            }
        }
    }

    pub fn create_admin(&mut self, email: &str, password: &str) -> Result<AdminUserInfo, EngineError> {
        let user = self.admins.create(email, password)?;
        info!("admin user {} created", user.email);
        Ok(user)
    }

    pub fn update_admin(&mut self, id: Ulid, email: &str, password: Option<&str>) -> Result<(), EngineError> {
        self.admins.update(id, email, password)?;
        info!("admin user {id} updated");
        Ok(())
    }

    pub fn delete_admin(&mut self, id: Ulid) -> Result<(), EngineError> {
        self.admins.delete(id)?;
        info!("admin user {id} deleted");
        Ok(())
    }
}

use tracing::info;

use crate::auth::{AdminDirectory, AdminUser};
use crate::model::*;
use crate::store::{self, Store};

use super::{Engine, EngineError, ReservationLedger, default_inventory};

impl Engine {
    /// Rebuild state from `store`. Missing blobs fall back to the seed
    /// inventory, an empty ledger, and a single bootstrap admin. Corrupt
    /// inventory or reservation blobs are moved aside and treated as missing;
    /// a corrupt admin list fails the load.
    pub fn load(
        store: &Store,
        vat_rate: f64,
        admin_email: &str,
        admin_password: &str,
    ) -> Result<Self, EngineError> {
        let inventory: Vec<InventoryItem> = store.load_or(store::INVENTORY, default_inventory);
        let entries: Vec<ConfirmedReservation> = store.load_or(store::RESERVATIONS, Vec::new);
        // A corrupt admin list must never be replaced by the bootstrap account.
        let users: Vec<AdminUser> = store.load(store::ADMIN_USERS)?.unwrap_or_default();

        let admins = if users.is_empty() {
            info!("no admin users stored, bootstrapping {admin_email}");
            let admins = AdminDirectory::bootstrap(admin_email, admin_password)?;
            store.save(store::ADMIN_USERS, &admins.users())?;
            admins
        } else {
            AdminDirectory::from_users(users)
        };

        info!(
            "loaded {} items, {} reservations, {} admin users from {}",
            inventory.len(),
            entries.len(),
            admins.len(),
            store.dir().display()
        );
        metrics::gauge!(crate::observability::INVENTORY_ITEMS).set(inventory.len() as f64);
        metrics::gauge!(crate::observability::LEDGER_SIZE).set(entries.len() as f64);

        Ok(Engine::new(
            inventory,
            ReservationLedger::from_entries(entries),
            admins,
            vat_rate,
        ))
    }

    /// Write one named blob.
    pub fn save_blob(&self, store: &Store, name: &str) -> Result<(), EngineError> {
        match name {
            store::INVENTORY => store.save(name, &self.inventory)?,
            store::RESERVATIONS => store.save(name, &self.ledger.all())?,
            store::ADMIN_USERS => store.save(name, &self.admins.users())?,
            other => return Err(EngineError::StoreError(format!("unknown blob: {other}"))),
        }
        Ok(())
    }

    pub fn save_all(&self, store: &Store) -> Result<(), EngineError> {
        for name in [store::INVENTORY, store::RESERVATIONS, store::ADMIN_USERS] {
            self.save_blob(store, name)?;
        }
        Ok(())
    }
}

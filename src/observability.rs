use std::net::SocketAddr;

use crate::sql::Command;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total console commands executed. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "rental_commands_total";

/// Histogram: command latency in seconds. Labels: command.
pub const COMMAND_DURATION_SECONDS: &str = "rental_command_duration_seconds";

/// Counter: failed admin logins.
pub const AUTH_FAILURES_TOTAL: &str = "rental_auth_failures_total";

// ── Domain metrics ──────────────────────────────────────────────

/// Counter: times a cart was clamped to fresh availability.
pub const CART_ADJUSTMENTS_TOTAL: &str = "rental_cart_adjustments_total";

/// Counter: reservations submitted.
pub const RESERVATIONS_SUBMITTED_TOTAL: &str = "rental_reservations_submitted_total";

/// Counter: reservation status changes. Labels: status.
pub const STATUS_CHANGES_TOTAL: &str = "rental_status_changes_total";

/// Gauge: items in the inventory.
pub const INVENTORY_ITEMS: &str = "rental_inventory_items";

/// Gauge: entries in the reservation ledger.
pub const LEDGER_SIZE: &str = "rental_ledger_size";

/// Histogram: blob save duration in seconds. Labels: blob.
pub const STORE_SAVE_DURATION_SECONDS: &str = "rental_store_save_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics"),
        Err(e) => tracing::error!("failed to install Prometheus metrics exporter: {e}"),
    }
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::SelectItems => "select_items",
        Command::SelectAvailability { .. } => "select_availability",
        Command::SelectCart => "select_cart",
        Command::SelectQuote => "select_quote",
        Command::SelectReservations { .. } => "select_reservations",
        Command::SelectAdminUsers => "select_admin_users",
        Command::SetDates { .. } => "set_dates",
        Command::SetCustomer { .. } => "set_customer",
        Command::SetCartLine { .. } => "set_cart_line",
        Command::DeleteCartLine { .. } => "delete_cart_line",
        Command::Submit => "submit",
        Command::InsertItem { .. } => "insert_item",
        Command::UpdateItem { .. } => "update_item",
        Command::DeleteItem { .. } => "delete_item",
        Command::SetStatus { .. } => "set_status",
        Command::InsertAdminUser { .. } => "insert_admin_user",
        Command::UpdateAdminUser { .. } => "update_admin_user",
        Command::DeleteAdminUser { .. } => "delete_admin_user",
        Command::Login { .. } => "login",
        Command::Logout => "logout",
    }
}

use std::io::{self, BufRead, Write};
use std::time::Instant;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::auth::AdminUserInfo;
use crate::engine::{Engine, EngineError};
use crate::model::*;
use crate::observability::{self, command_label};
use crate::sql::{self, Command, SqlError};
use crate::store::{self, Store};

const ADJUSTED_NOTICE: &str =
    "some cart quantities were adjusted to match availability for the selected dates";

/// One reply to a console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Statement completed; `rows` is the number of entities touched.
    Execution { tag: &'static str, rows: usize },
    /// Result set, one JSON object per row.
    Rows(Vec<Value>),
    /// Something the user should be told about, such as a clamped cart.
    Notice(String),
}

#[derive(Debug)]
pub enum ConsoleError {
    Sql(SqlError),
    Engine(EngineError),
    Encode(String),
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleError::Sql(e) => write!(f, "{e}"),
            ConsoleError::Engine(e) => write!(f, "{e}"),
            ConsoleError::Encode(e) => write!(f, "encode error: {e}"),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<SqlError> for ConsoleError {
    fn from(e: SqlError) -> Self {
        ConsoleError::Sql(e)
    }
}

impl From<EngineError> for ConsoleError {
    fn from(e: EngineError) -> Self {
        ConsoleError::Engine(e)
    }
}

fn to_rows<T: Serialize>(items: impl IntoIterator<Item = T>) -> Result<Vec<Value>, ConsoleError> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(|e| ConsoleError::Encode(e.to_string())))
        .collect()
}

fn adjustment_notice(adjustment: &Adjustment) -> Option<Response> {
    adjustment
        .changed
        .then(|| Response::Notice(ADJUSTED_NOTICE.to_string()))
}

/// Interactive session over an engine: parses commands, enforces admin login,
/// runs them, and saves affected blobs after every successful mutation.
pub struct Console {
    engine: Engine,
    store: Option<Store>,
    admin: Option<AdminUserInfo>,
}

impl Console {
    /// `store` is `None` for a session that is never written to disk.
    pub fn new(engine: Engine, store: Option<Store>) -> Self {
        Self {
            engine,
            store,
            admin: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn admin(&self) -> Option<&AdminUserInfo> {
        self.admin.as_ref()
    }

    /// Parse and run one command line.
    pub fn execute_line(&mut self, line: &str) -> Result<Vec<Response>, ConsoleError> {
        let cmd = sql::parse_command(line)?;
        self.execute(cmd)
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Vec<Response>, ConsoleError> {
        let label = command_label(&cmd);
        let start = Instant::now();
        let blob = blob_for(&cmd);
        let mutation = cmd.is_mutation();

        // The change is already applied in memory when a save fails, so the
        // command still succeeds and the user is told it was not written.
        let mut unsaved = false;
        let result = self.dispatch(cmd).map(|mut responses| {
            if let Some(name) = blob
                && let Err(e) = self.persist(name)
            {
                error!("{label} applied but {name} not saved: {e}");
                responses.push(Response::Notice(format!(
                    "change applied but not saved to disk: {e}"
                )));
                unsaved = true;
            }
            responses
        });

        let status = match &result {
            Ok(_) if unsaved => "unsaved",
            Ok(_) => "ok",
            Err(_) => "error",
        };
        metrics::counter!(observability::COMMANDS_TOTAL, "command" => label, "status" => status).increment(1);
        metrics::histogram!(observability::COMMAND_DURATION_SECONDS, "command" => label)
            .record(start.elapsed().as_secs_f64());
        match &result {
            Ok(_) if mutation => info!("{label} applied"),
            Ok(_) => debug!("{label}: ok"),
            Err(e) => debug!("{label} failed: {e}"),
        }
        result
    }

    fn persist(&self, name: &'static str) -> Result<(), ConsoleError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        self.engine.save_blob(store, name)?;
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Response>, ConsoleError> {
        if cmd.requires_admin() && self.admin.is_none() {
            return Err(EngineError::Unauthorized.into());
        }

        let engine = &mut self.engine;
        match cmd {
            Command::SelectItems => Ok(vec![Response::Rows(to_rows(engine.inventory())?)]),
            Command::SelectAvailability {
                pickup_date,
                return_date,
            } => {
                let view = if pickup_date.is_none() && return_date.is_none() {
                    engine.availability()
                } else {
                    let candidate = CandidateRange::parse(
                        pickup_date.as_deref().unwrap_or(""),
                        return_date.as_deref().unwrap_or(""),
                    );
                    engine.availability_for(&candidate)
                };
                Ok(vec![Response::Rows(to_rows(view)?)])
            }
            Command::SelectCart => {
                let rows = engine
                    .draft()
                    .cart
                    .iter()
                    .map(|(item_id, quantity)| {
                        let unit_price = engine.get_item(item_id).map(|i| i.unit_price);
                        json!({
                            "item_id": item_id,
                            "quantity": quantity,
                            "unit_price": unit_price,
                        })
                    })
                    .collect();
                Ok(vec![Response::Rows(rows)])
            }
            Command::SelectQuote => {
                let quote = engine.quote();
                Ok(vec![Response::Rows(vec![json!({
                    "subtotal": quote.subtotal,
                    "vat_rate": engine.vat_rate(),
                    "total": quote.total,
                })])])
            }
            Command::SelectReservations { status } => {
                let rows = match status {
                    Some(s) => to_rows(engine.reservations_with_status(s))?,
                    None => to_rows(engine.ledger().all())?,
                };
                Ok(vec![Response::Rows(rows)])
            }
            Command::SelectAdminUsers => Ok(vec![Response::Rows(to_rows(engine.admins().list())?)]),
            Command::SetDates {
                pickup_date,
                return_date,
            } => {
                let adjustment = engine.set_dates(&pickup_date, &return_date);
                let mut out = vec![Response::Execution { tag: "INSERT", rows: 1 }];
                out.extend(adjustment_notice(&adjustment));
                Ok(out)
            }
            Command::SetCustomer { customer } => {
                engine.set_customer(customer)?;
                Ok(vec![Response::Execution { tag: "INSERT", rows: 1 }])
            }
            Command::SetCartLine { item_id, quantity } => {
                let stored = engine.set_cart_quantity(&item_id, quantity)?;
                let mut out = vec![Response::Execution { tag: "INSERT", rows: 1 }];
                if stored < quantity {
                    out.push(Response::Notice(format!(
                        "only {stored} of {item_id} available for the selected dates"
                    )));
                }
                Ok(out)
            }
            Command::DeleteCartLine { item_id } => {
                let removed = engine.remove_cart_line(&item_id);
                Ok(vec![Response::Execution {
                    tag: "DELETE",
                    rows: usize::from(removed),
                }])
            }
            Command::Submit => {
                let entry = engine.submit()?;
                Ok(vec![
                    Response::Execution { tag: "INSERT", rows: 1 },
                    Response::Rows(to_rows([&entry])?),
                ])
            }
            Command::InsertItem { item } => {
                let item = engine.add_item(item)?;
                Ok(vec![
                    Response::Execution { tag: "INSERT", rows: 1 },
                    Response::Rows(to_rows([&item])?),
                ])
            }
            Command::UpdateItem { item } => {
                let adjustment = engine.update_item(item)?;
                let mut out = vec![Response::Execution { tag: "UPDATE", rows: 1 }];
                out.extend(adjustment_notice(&adjustment));
                Ok(out)
            }
            Command::DeleteItem { id } => {
                engine.delete_item(&id)?;
                Ok(vec![Response::Execution { tag: "DELETE", rows: 1 }])
            }
            Command::SetStatus { id, status } => {
                let adjustment = engine.set_status(id, status)?;
                let mut out = vec![Response::Execution { tag: "UPDATE", rows: 1 }];
                out.extend(adjustment_notice(&adjustment));
                Ok(out)
            }
            Command::InsertAdminUser { email, password } => {
                let user = engine.create_admin(&email, &password)?;
                Ok(vec![
                    Response::Execution { tag: "INSERT", rows: 1 },
                    Response::Rows(to_rows([&user])?),
                ])
            }
            Command::UpdateAdminUser { id, email, password } => {
                engine.update_admin(id, &email, password.as_deref())?;
                Ok(vec![Response::Execution { tag: "UPDATE", rows: 1 }])
            }
            Command::DeleteAdminUser { id } => {
                engine.delete_admin(id)?;
                Ok(vec![Response::Execution { tag: "DELETE", rows: 1 }])
            }
            Command::Login { email, password } => {
                let user = engine.login(&email, &password)?;
                self.admin = Some(user);
                Ok(vec![Response::Execution { tag: "LOGIN", rows: 1 }])
            }
            Command::Logout => {
                if let Some(user) = self.admin.take() {
                    info!("admin {} logged out", user.email);
                }
                Ok(vec![Response::Execution { tag: "LOGOUT", rows: 0 }])
            }
        }
    }

    /// Read commands line by line until EOF, writing replies to `output`.
    /// Command errors are reported inline and do not end the session.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            match self.execute_line(trimmed) {
                Ok(responses) => {
                    for response in responses {
                        write_response(&mut output, &response)?;
                    }
                }
                Err(e) => writeln!(output, "ERROR: {e}")?,
            }
            output.flush()?;
        }
        Ok(())
    }
}

fn write_response(output: &mut impl Write, response: &Response) -> io::Result<()> {
    match response {
        Response::Execution { tag, rows } => writeln!(output, "{tag} {rows}"),
        Response::Rows(rows) => {
            for row in rows {
                writeln!(output, "{row}")?;
            }
            writeln!(output, "({} rows)", rows.len())
        }
        Response::Notice(msg) => writeln!(output, "NOTICE: {msg}"),
    }
}

/// Blob to save after the command succeeds, if it changes persisted state.
fn blob_for(cmd: &Command) -> Option<&'static str> {
    match cmd {
        Command::InsertItem { .. } | Command::UpdateItem { .. } | Command::DeleteItem { .. } => {
            Some(store::INVENTORY)
        }
        Command::Submit | Command::SetStatus { .. } => Some(store::RESERVATIONS),
        Command::InsertAdminUser { .. }
        | Command::UpdateAdminUser { .. }
        | Command::DeleteAdminUser { .. } => Some(store::ADMIN_USERS),
        _ => None,
    }
}

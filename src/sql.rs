use sqlparser::ast::{self, Expr, FromTable, ObjectNamePart, SetExpr, Statement, TableFactor, TableObject, Value, ValueWithSpan};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use ulid::Ulid;

use crate::limits::MAX_COMMAND_LEN;
use crate::model::*;

/// Parsed console command.
///
/// Values are positional, in the column order documented per table; a column
/// list in the statement is accepted but not interpreted.
#[derive(Debug, PartialEq)]
pub enum Command {
    SelectItems,
    /// Without dates, uses the draft's dates.
    SelectAvailability {
        pickup_date: Option<String>,
        return_date: Option<String>,
    },
    SelectCart,
    SelectQuote,
    SelectReservations {
        status: Option<ReservationStatus>,
    },
    SelectAdminUsers,
    /// `dates (pickup_date, return_date)`
    SetDates {
        pickup_date: String,
        return_date: String,
    },
    /// `customer (first_name, last_name, phone, email, event_address[, needs_transport])`
    SetCustomer {
        customer: Customer,
    },
    /// `cart (item_id, quantity)`
    SetCartLine {
        item_id: String,
        quantity: u32,
    },
    DeleteCartLine {
        item_id: String,
    },
    Submit,
    /// `items (name, category, total_quantity, unit_price, unit[, image_url])`
    InsertItem {
        item: NewItem,
    },
    /// `items (id, name, category, total_quantity, unit_price, unit[, image_url]) ON CONFLICT ...`
    UpdateItem {
        item: InventoryItem,
    },
    DeleteItem {
        id: String,
    },
    /// `reviews (reservation_id, status)`
    SetStatus {
        id: Ulid,
        status: ReservationStatus,
    },
    /// `admin_users (email, password)`
    InsertAdminUser {
        email: String,
        password: String,
    },
    /// `admin_users (id, email[, password]) ON CONFLICT ...`
    UpdateAdminUser {
        id: Ulid,
        email: String,
        password: Option<String>,
    },
    DeleteAdminUser {
        id: Ulid,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
}

impl Command {
    /// Whether the command changes state that is persisted or shown to the customer.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Command::SelectItems
                | Command::SelectAvailability { .. }
                | Command::SelectCart
                | Command::SelectQuote
                | Command::SelectReservations { .. }
                | Command::SelectAdminUsers
                | Command::Login { .. }
                | Command::Logout
        )
    }

    /// Whether only a logged-in administrator may run the command.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Command::SelectReservations { .. }
                | Command::SelectAdminUsers
                | Command::InsertItem { .. }
                | Command::UpdateItem { .. }
                | Command::DeleteItem { .. }
                | Command::SetStatus { .. }
                | Command::InsertAdminUser { .. }
                | Command::UpdateAdminUser { .. }
                | Command::DeleteAdminUser { .. }
        )
    }
}

pub fn parse_command(sql: &str) -> Result<Command, SqlError> {
    if sql.len() > MAX_COMMAND_LEN {
        return Err(SqlError::TooLong);
    }
    let trimmed = sql.trim().trim_end_matches(';').trim();
    if trimmed.is_empty() {
        return Err(SqlError::Empty);
    }
    if trimmed.eq_ignore_ascii_case("SUBMIT") {
        return Ok(Command::Submit);
    }
    if trimmed.eq_ignore_ascii_case("LOGOUT") {
        return Ok(Command::Logout);
    }
    if let Some(rest) = strip_keyword(trimmed, "LOGIN ") {
        let args = parse_quoted_args(rest)?;
        if args.len() != 2 {
            return Err(SqlError::WrongArity("LOGIN", 2, args.len()));
        }
        let mut args = args.into_iter();
        let email = args.next().unwrap_or_default();
        let password = args.next().unwrap_or_default();
        return Ok(Command::Login { email, password });
    }

    let dialect = PostgreSqlDialect {};
    let stmts = Parser::parse_sql(&dialect, trimmed).map_err(|e| SqlError::Parse(e.to_string()))?;
    if stmts.is_empty() {
        return Err(SqlError::Empty);
    }

    match &stmts[0] {
        Statement::Insert(insert) => parse_insert(insert),
        Statement::Delete(delete) => parse_delete(delete),
        Statement::Query(query) => parse_select(query),
        other => Err(SqlError::Unsupported(format!("{other}"))),
    }
}

fn parse_insert(insert: &ast::Insert) -> Result<Command, SqlError> {
    let table = insert_table_name(insert)?;
    if table == "reservations" {
        return Ok(Command::Submit);
    }
    let values = extract_insert_values(insert)?;
    let upsert = insert.on.is_some();

    match table.as_str() {
        "dates" => {
            expect_arity("dates", &values, 2)?;
            Ok(Command::SetDates {
                pickup_date: parse_string(&values[0])?,
                return_date: parse_string(&values[1])?,
            })
        }
        "customer" => {
            if values.len() < 5 {
                return Err(SqlError::WrongArity("customer", 5, values.len()));
            }
            let needs_transport = match values.get(5) {
                Some(v) => parse_bool(v)?,
                None => false,
            };
            Ok(Command::SetCustomer {
                customer: Customer {
                    first_name: parse_string(&values[0])?,
                    last_name: parse_string(&values[1])?,
                    phone: parse_string(&values[2])?,
                    email: parse_string(&values[3])?,
                    event_address: parse_string(&values[4])?,
                    needs_transport,
                },
            })
        }
        "cart" => {
            expect_arity("cart", &values, 2)?;
            Ok(Command::SetCartLine {
                item_id: parse_string(&values[0])?,
                quantity: parse_u32(&values[1])?,
            })
        }
        "items" if upsert => {
            if values.len() < 6 {
                return Err(SqlError::WrongArity("items upsert", 6, values.len()));
            }
            Ok(Command::UpdateItem {
                item: InventoryItem {
                    id: parse_string(&values[0])?,
                    name: parse_string(&values[1])?,
                    category: parse_category(&values[2])?,
                    total_quantity: parse_u32(&values[3])?,
                    unit_price: parse_f64(&values[4])?,
                    unit: parse_string(&values[5])?,
                    image_url: values.get(6).map(parse_string_or_null).transpose()?.flatten(),
                },
            })
        }
        "items" => {
            if values.len() < 5 {
                return Err(SqlError::WrongArity("items", 5, values.len()));
            }
            Ok(Command::InsertItem {
                item: NewItem {
                    name: parse_string(&values[0])?,
                    category: parse_category(&values[1])?,
                    total_quantity: parse_u32(&values[2])?,
                    unit_price: parse_f64(&values[3])?,
                    unit: parse_string(&values[4])?,
                    image_url: values.get(5).map(parse_string_or_null).transpose()?.flatten(),
                },
            })
        }
        "reviews" => {
            expect_arity("reviews", &values, 2)?;
            let status = parse_string(&values[1])?;
            Ok(Command::SetStatus {
                id: parse_ulid(&values[0])?,
                status: status.parse().map_err(SqlError::Parse)?,
            })
        }
        "admin_users" if upsert => {
            if values.len() < 2 {
                return Err(SqlError::WrongArity("admin_users upsert", 2, values.len()));
            }
            Ok(Command::UpdateAdminUser {
                id: parse_ulid(&values[0])?,
                email: parse_string(&values[1])?,
                password: values.get(2).map(parse_string_or_null).transpose()?.flatten(),
            })
        }
        "admin_users" => {
            expect_arity("admin_users", &values, 2)?;
            Ok(Command::InsertAdminUser {
                email: parse_string(&values[0])?,
                password: parse_string(&values[1])?,
            })
        }
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn parse_delete(delete: &ast::Delete) -> Result<Command, SqlError> {
    let table = delete_table_name(delete)?;
    let key = extract_where_eq(&delete.selection, "id")?;

    match table.as_str() {
        "cart" => Ok(Command::DeleteCartLine {
            item_id: parse_string(key)?,
        }),
        "items" => Ok(Command::DeleteItem {
            id: parse_string(key)?,
        }),
        "admin_users" => Ok(Command::DeleteAdminUser { id: parse_ulid(key)? }),
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn parse_select(query: &ast::Query) -> Result<Command, SqlError> {
    let select = match query.body.as_ref() {
        SetExpr::Select(s) => s,
        _ => return Err(SqlError::Unsupported("non-SELECT query".into())),
    };

    if select.from.is_empty() {
        return Err(SqlError::Parse("SELECT without FROM".into()));
    }
    let table = table_factor_name(&select.from[0].relation)?;

    let mut filters = Vec::new();
    if let Some(selection) = &select.selection {
        collect_eq_filters(selection, &mut filters)?;
    }
    let filter = |col: &str| filters.iter().find(|(c, _)| c == col).map(|(_, e)| *e);

    match table.as_str() {
        "items" => Ok(Command::SelectItems),
        "availability" => {
            let pickup_date = filter("pickup_date").map(parse_string).transpose()?;
            let return_date = filter("return_date").map(parse_string).transpose()?;
            Ok(Command::SelectAvailability {
                pickup_date,
                return_date,
            })
        }
        "cart" => Ok(Command::SelectCart),
        "quote" => Ok(Command::SelectQuote),
        "reservations" => {
            let status = match filter("status") {
                Some(e) => Some(parse_string(e)?.parse().map_err(SqlError::Parse)?),
                None => None,
            };
            Ok(Command::SelectReservations { status })
        }
        "admin_users" => Ok(Command::SelectAdminUsers),
        _ => Err(SqlError::UnknownTable(table)),
    }
}

/// Collect `column = value` pairs joined by AND.
fn collect_eq_filters<'a>(expr: &'a Expr, out: &mut Vec<(String, &'a Expr)>) -> Result<(), SqlError> {
    match expr {
        Expr::BinaryOp { left, op, right } => match op {
            ast::BinaryOperator::And => {
                collect_eq_filters(left, out)?;
                collect_eq_filters(right, out)?;
            }
            ast::BinaryOperator::Eq => {
                let col = expr_column_name(left)
                    .ok_or_else(|| SqlError::Parse(format!("expected column, got {left}")))?;
                out.push((col, &**right));
            }
            _ => return Err(SqlError::Unsupported(format!("filter operator {op}"))),
        },
        Expr::Nested(inner) => collect_eq_filters(inner, out)?,
        other => return Err(SqlError::Unsupported(format!("filter {other}"))),
    }
    Ok(())
}

fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| &input[keyword.len()..])
}

/// Split `'a' 'b c'` into its single-quoted arguments. `''` escapes a quote.
fn parse_quoted_args(input: &str) -> Result<Vec<String>, SqlError> {
    let mut args = Vec::new();
    let mut chars = input.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some('\'') => {}
            Some(c) => return Err(SqlError::Parse(format!("expected quoted argument, got {c:?}"))),
        }
        let mut arg = String::new();
        loop {
            match chars.next() {
                None => return Err(SqlError::Parse("unterminated quoted argument".into())),
                Some('\'') if chars.peek() == Some(&'\'') => {
                    chars.next();
                    arg.push('\'');
                }
                Some('\'') => break,
                Some(c) => arg.push(c),
            }
        }
        args.push(arg);
    }
    Ok(args)
}

// ── Helpers ───────────────────────────────────────────────────

fn expect_arity(table: &'static str, values: &[Expr], expected: usize) -> Result<(), SqlError> {
    if values.len() != expected {
        return Err(SqlError::WrongArity(table, expected, values.len()));
    }
    Ok(())
}

fn object_name_last(name: &ast::ObjectName) -> Option<String> {
    name.0.last().and_then(|part| match part {
        ObjectNamePart::Identifier(ident) => Some(ident.value.to_lowercase()),
        _ => None,
    })
}

fn insert_table_name(insert: &ast::Insert) -> Result<String, SqlError> {
    match &insert.table {
        TableObject::TableName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("unsupported table object in INSERT".into())),
    }
}

fn delete_table_name(delete: &ast::Delete) -> Result<String, SqlError> {
    let tables_with_joins = match &delete.from {
        FromTable::WithFromKeyword(t) | FromTable::WithoutKeyword(t) => t,
    };
    if let Some(first) = tables_with_joins.first() {
        table_factor_name(&first.relation)
    } else {
        Err(SqlError::Parse("DELETE without table".into()))
    }
}

fn table_factor_name(tf: &TableFactor) -> Result<String, SqlError> {
    match tf {
        TableFactor::Table { name, .. } => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("complex table expression".into())),
    }
}

fn extract_insert_values(insert: &ast::Insert) -> Result<Vec<Expr>, SqlError> {
    let body = insert
        .source
        .as_ref()
        .ok_or(SqlError::Parse("no VALUES".into()))?;
    match body.body.as_ref() {
        SetExpr::Values(values) => {
            if values.rows.len() != 1 {
                return Err(SqlError::Parse("expected exactly one VALUES row".into()));
            }
            Ok(values.rows[0].clone())
        }
        _ => Err(SqlError::Parse("expected VALUES".into())),
    }
}

fn extract_where_eq<'a>(selection: &'a Option<Expr>, column: &'static str) -> Result<&'a Expr, SqlError> {
    let sel = selection.as_ref().ok_or(SqlError::MissingFilter(column))?;
    match sel {
        Expr::BinaryOp {
            left,
            op: ast::BinaryOperator::Eq,
            right,
        } if expr_column_name(left).as_deref() == Some(column) => Ok(&**right),
        _ => Err(SqlError::MissingFilter(column)),
    }
}

fn expr_column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.to_lowercase()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|i| i.value.to_lowercase()),
        _ => None,
    }
}

fn extract_value(expr: &Expr) -> Option<&Value> {
    match expr {
        Expr::Value(ValueWithSpan { value, .. }) => Some(value),
        _ => None,
    }
}

fn parse_string(expr: &Expr) -> Result<String, SqlError> {
    match extract_value(expr) {
        Some(Value::SingleQuotedString(s)) | Some(Value::Number(s, _)) => Ok(s.clone()),
        Some(value) => Err(SqlError::Parse(format!("expected string, got {value:?}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr:?}"))),
    }
}

fn parse_string_or_null(expr: &Expr) -> Result<Option<String>, SqlError> {
    match extract_value(expr) {
        Some(Value::Null) => Ok(None),
        _ => parse_string(expr).map(Some),
    }
}

fn parse_ulid(expr: &Expr) -> Result<Ulid, SqlError> {
    let s = parse_string(expr)?;
    Ulid::from_string(&s).map_err(|e| SqlError::Parse(format!("bad ULID: {e}")))
}

fn parse_category(expr: &Expr) -> Result<Category, SqlError> {
    parse_string(expr)?.parse().map_err(SqlError::Parse)
}

fn parse_i64_expr(expr: &Expr) -> Result<i64, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Number(s, _) | Value::SingleQuotedString(s) => s
                .trim()
                .parse()
                .map_err(|e| SqlError::Parse(format!("bad integer: {e}"))),
            _ => Err(SqlError::Parse(format!("expected number, got {value:?}"))),
        }
    } else if let Expr::UnaryOp {
        op: ast::UnaryOperator::Minus,
        expr,
    } = expr
    {
        Ok(-parse_i64_expr(expr)?)
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr:?}")))
    }
}

fn parse_u32(expr: &Expr) -> Result<u32, SqlError> {
    let v = parse_i64_expr(expr)?;
    u32::try_from(v).map_err(|_| SqlError::Parse(format!("{v} out of range for a quantity")))
}

fn parse_f64(expr: &Expr) -> Result<f64, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Number(s, _) | Value::SingleQuotedString(s) => s
                .trim()
                .parse()
                .map_err(|e| SqlError::Parse(format!("bad number: {e}"))),
            _ => Err(SqlError::Parse(format!("expected number, got {value:?}"))),
        }
    } else if let Expr::UnaryOp {
        op: ast::UnaryOperator::Minus,
        expr,
    } = expr
    {
        Ok(-parse_f64(expr)?)
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr:?}")))
    }
}

fn parse_bool(expr: &Expr) -> Result<bool, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::SingleQuotedString(s) => match s.to_lowercase().as_str() {
                "true" | "t" | "1" | "yes" => Ok(true),
                "false" | "f" | "0" | "no" => Ok(false),
                _ => Err(SqlError::Parse(format!("bad bool: {s}"))),
            },
            Value::Number(n, _) => Ok(n != "0"),
            _ => Err(SqlError::Parse(format!("expected bool, got {value:?}"))),
        }
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr:?}")))
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SqlError {
    Parse(String),
    Empty,
    TooLong,
    Unsupported(String),
    UnknownTable(String),
    WrongArity(&'static str, usize, usize),
    MissingFilter(&'static str),
}

impl std::fmt::Display for SqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlError::Parse(s) => write!(f, "parse error: {s}"),
            SqlError::Empty => write!(f, "empty command"),
            SqlError::TooLong => write!(f, "command too long"),
            SqlError::Unsupported(s) => write!(f, "unsupported: {s}"),
            SqlError::UnknownTable(t) => write!(f, "unknown table: {t}"),
            SqlError::WrongArity(t, expected, got) => {
                write!(f, "{t}: expected {expected} values, got {got}")
            }
            SqlError::MissingFilter(col) => write!(f, "missing filter: {col}"),
        }
    }
}

impl std::error::Error for SqlError {}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";

    #[test]
    fn parse_set_dates() {
        let cmd = parse_command("INSERT INTO dates (pickup_date, return_date) VALUES ('2024-06-01', '2024-06-03')").unwrap();
        assert_eq!(
            cmd,
            Command::SetDates {
                pickup_date: "2024-06-01".into(),
                return_date: "2024-06-03".into(),
            }
        );
    }

    #[test]
    fn parse_set_dates_wrong_arity() {
        let result = parse_command("INSERT INTO dates VALUES ('2024-06-01')");
        assert!(matches!(result, Err(SqlError::WrongArity("dates", 2, 1))));
    }

    #[test]
    fn parse_customer_defaults_transport() {
        let cmd = parse_command(
            "INSERT INTO customer VALUES ('Ana', 'Ruiz', '555-0101', 'ana@example.com', 'Main St 1')",
        )
        .unwrap();
        match cmd {
            Command::SetCustomer { customer } => {
                assert_eq!(customer.first_name, "Ana");
                assert_eq!(customer.event_address, "Main St 1");
                assert!(!customer.needs_transport);
            }
            _ => panic!("expected SetCustomer, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_customer_with_transport() {
        let cmd = parse_command(
            "INSERT INTO customer VALUES ('Ana', 'Ruiz', '555', 'ana@example.com', 'Main St 1', true)",
        )
        .unwrap();
        assert!(matches!(cmd, Command::SetCustomer { customer } if customer.needs_transport));
    }

    #[test]
    fn parse_cart_line() {
        let cmd = parse_command("INSERT INTO cart (item_id, quantity) VALUES ('event-chairs', 80);").unwrap();
        assert_eq!(
            cmd,
            Command::SetCartLine {
                item_id: "event-chairs".into(),
                quantity: 80,
            }
        );
    }

    #[test]
    fn parse_negative_quantity_rejected() {
        let result = parse_command("INSERT INTO cart VALUES ('event-chairs', -1)");
        assert!(matches!(result, Err(SqlError::Parse(_))));
    }

    #[test]
    fn parse_delete_cart_line() {
        let cmd = parse_command("DELETE FROM cart WHERE id = 'event-chairs'").unwrap();
        assert_eq!(
            cmd,
            Command::DeleteCartLine {
                item_id: "event-chairs".into()
            }
        );
    }

    #[test]
    fn parse_insert_item() {
        let cmd = parse_command(
            "INSERT INTO items (name, category, total_quantity, unit_price, unit) VALUES ('Round Tablecloth', 'linen', 30, 2.5, 'per event')",
        )
        .unwrap();
        match cmd {
            Command::InsertItem { item } => {
                assert_eq!(item.name, "Round Tablecloth");
                assert_eq!(item.category, Category::Linen);
                assert_eq!(item.total_quantity, 30);
                assert_eq!(item.unit_price, 2.5);
                assert_eq!(item.image_url, None);
            }
            _ => panic!("expected InsertItem, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_item_upsert_is_update() {
        let cmd = parse_command(
            "INSERT INTO items VALUES ('event-chairs', 'Event Chairs', 'furniture', 80, 1, 'per event', NULL) \
             ON CONFLICT (id) DO UPDATE SET total_quantity = excluded.total_quantity",
        )
        .unwrap();
        match cmd {
            Command::UpdateItem { item } => {
                assert_eq!(item.id, "event-chairs");
                assert_eq!(item.total_quantity, 80);
                assert_eq!(item.unit_price, 1.0);
                assert_eq!(item.image_url, None);
            }
            _ => panic!("expected UpdateItem, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_item_unknown_category() {
        let result = parse_command("INSERT INTO items VALUES ('Tent', 'outdoor', 3, 100, 'per event')");
        assert!(matches!(result, Err(SqlError::Parse(_))));
    }

    #[test]
    fn parse_delete_item() {
        let cmd = parse_command("DELETE FROM items WHERE id = 'rectangular-tables'").unwrap();
        assert_eq!(
            cmd,
            Command::DeleteItem {
                id: "rectangular-tables".into()
            }
        );
    }

    #[test]
    fn parse_review() {
        let sql = format!("INSERT INTO reviews (reservation_id, status) VALUES ('{ID}', 'validated')");
        let cmd = parse_command(&sql).unwrap();
        match cmd {
            Command::SetStatus { id, status } => {
                assert_eq!(id.to_string(), ID);
                assert_eq!(status, ReservationStatus::Validated);
            }
            _ => panic!("expected SetStatus, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_review_bad_status() {
        let sql = format!("INSERT INTO reviews VALUES ('{ID}', 'approved')");
        assert!(matches!(parse_command(&sql), Err(SqlError::Parse(_))));
    }

    #[test]
    fn parse_admin_user_insert_update_delete() {
        let cmd = parse_command("INSERT INTO admin_users (email, password) VALUES ('ops@example.com', 'pw')").unwrap();
        assert_eq!(
            cmd,
            Command::InsertAdminUser {
                email: "ops@example.com".into(),
                password: "pw".into(),
            }
        );

        let sql = format!(
            "INSERT INTO admin_users (id, email) VALUES ('{ID}', 'root@example.com') ON CONFLICT (id) DO UPDATE SET email = excluded.email"
        );
        match parse_command(&sql).unwrap() {
            Command::UpdateAdminUser { id, email, password } => {
                assert_eq!(id.to_string(), ID);
                assert_eq!(email, "root@example.com");
                assert_eq!(password, None);
            }
            other => panic!("expected UpdateAdminUser, got {other:?}"),
        }

        let sql = format!("DELETE FROM admin_users WHERE id = '{ID}'");
        assert!(matches!(parse_command(&sql).unwrap(), Command::DeleteAdminUser { .. }));
    }

    #[test]
    fn parse_select_availability_with_dates() {
        let cmd = parse_command(
            "SELECT * FROM availability WHERE pickup_date = '2024-06-02' AND return_date = '2024-06-02'",
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::SelectAvailability {
                pickup_date: Some("2024-06-02".into()),
                return_date: Some("2024-06-02".into()),
            }
        );
    }

    #[test]
    fn parse_select_availability_for_draft() {
        let cmd = parse_command("SELECT * FROM availability").unwrap();
        assert_eq!(
            cmd,
            Command::SelectAvailability {
                pickup_date: None,
                return_date: None,
            }
        );
    }

    #[test]
    fn parse_select_reservations_by_status() {
        let cmd = parse_command("SELECT * FROM reservations WHERE status = 'pending'").unwrap();
        assert_eq!(
            cmd,
            Command::SelectReservations {
                status: Some(ReservationStatus::Pending)
            }
        );
    }

    #[test]
    fn parse_select_simple_tables() {
        assert_eq!(parse_command("SELECT * FROM items").unwrap(), Command::SelectItems);
        assert_eq!(parse_command("select * from cart").unwrap(), Command::SelectCart);
        assert_eq!(parse_command("SELECT * FROM quote").unwrap(), Command::SelectQuote);
        assert_eq!(parse_command("SELECT * FROM admin_users").unwrap(), Command::SelectAdminUsers);
    }

    #[test]
    fn parse_login_logout_submit() {
        let cmd = parse_command("LOGIN 'admin@example.com' 'it''s secret'").unwrap();
        assert_eq!(
            cmd,
            Command::Login {
                email: "admin@example.com".into(),
                password: "it's secret".into(),
            }
        );
        assert_eq!(parse_command("logout").unwrap(), Command::Logout);
        assert_eq!(parse_command("SUBMIT;").unwrap(), Command::Submit);
    }

    #[test]
    fn parse_login_requires_two_args() {
        assert!(matches!(
            parse_command("LOGIN 'admin@example.com'"),
            Err(SqlError::WrongArity("LOGIN", 2, 1))
        ));
        assert!(matches!(parse_command("LOGIN 'unterminated"), Err(SqlError::Parse(_))));
    }

    #[test]
    fn parse_unknown_table_errors() {
        assert!(matches!(
            parse_command("INSERT INTO foobar VALUES ('x')"),
            Err(SqlError::UnknownTable(_))
        ));
        assert!(matches!(
            parse_command("SELECT * FROM foobar"),
            Err(SqlError::UnknownTable(_))
        ));
    }

    #[test]
    fn parse_empty_errors() {
        assert!(matches!(parse_command(""), Err(SqlError::Empty)));
        assert!(matches!(parse_command("  ;"), Err(SqlError::Empty)));
    }

    #[test]
    fn admin_commands_flagged() {
        assert!(parse_command("DELETE FROM items WHERE id = 'x'").unwrap().requires_admin());
        assert!(!parse_command("SELECT * FROM availability").unwrap().requires_admin());
        assert!(parse_command("SUBMIT").unwrap().is_mutation());
        assert!(!parse_command("SELECT * FROM cart").unwrap().is_mutation());
    }
}

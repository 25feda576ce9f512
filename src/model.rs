use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Calendar format accepted for pickup and return dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed interval `[start, end]` of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "DateRange start must not be after end");
        Self { start, end }
    }

    /// Parse both endpoints. `None` if either is missing, malformed, or the
    /// range is inverted.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        if start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Inclusive on both ends: a range ending the day another starts overlaps it.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// The date window a customer is currently selecting.
///
/// `Unconstrained` stands for "no usable dates yet": availability then equals
/// total stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateRange {
    Constrained(DateRange),
    #[default]
    Unconstrained,
}

impl CandidateRange {
    pub fn parse(pickup: &str, return_date: &str) -> Self {
        match DateRange::parse(pickup, return_date) {
            Some(range) => CandidateRange::Constrained(range),
            None => CandidateRange::Unconstrained,
        }
    }

    pub fn range(&self) -> Option<DateRange> {
        match self {
            CandidateRange::Constrained(range) => Some(*range),
            CandidateRange::Unconstrained => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Furniture,
    Linen,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Furniture => "furniture",
            Category::Linen => "linen",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "furniture" | "mobiliario" => Ok(Category::Furniture),
            "linen" | "manteleria" | "mantelería" => Ok(Category::Linen),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// A rentable item and its authoritative stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Stable slug, e.g. `event-chairs`.
    pub id: String,
    pub name: String,
    pub category: Category,
    pub total_quantity: u32,
    pub unit_price: f64,
    /// Pricing unit label, e.g. "per event".
    pub unit: String,
    pub image_url: Option<String>,
}

/// Item fields supplied by an administrator; the id is derived from the name.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub total_quantity: u32,
    pub unit_price: f64,
    pub unit: String,
    pub image_url: Option<String>,
}

impl NewItem {
    pub fn into_item(self) -> InventoryItem {
        InventoryItem {
            id: slugify(&self.name),
            name: self.name,
            category: self.category,
            total_quantity: self.total_quantity,
            unit_price: self.unit_price,
            unit: self.unit,
            image_url: self.image_url,
        }
    }
}

/// Lowercase the name and join whitespace-separated words with `-`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Requested quantity per item id. A missing key means zero.
pub type Cart = BTreeMap<String, u32>;

/// Contact details of the customer placing a reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub event_address: String,
    pub needs_transport: bool,
}

impl Customer {
    /// First required field left blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("event_address", &self.event_address),
        ];
        fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

/// The reservation a customer is still editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub customer: Customer,
    pub pickup_date: String,
    pub return_date: String,
    pub cart: Cart,
}

impl Draft {
    pub fn candidate(&self) -> CandidateRange {
        CandidateRange::parse(&self.pickup_date, &self.return_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Validated,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Validated => "validated",
            ReservationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "validated" => Ok(ReservationStatus::Validated),
            "rejected" => Ok(ReservationStatus::Rejected),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// A submitted reservation. Everything except `status` is frozen at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedReservation {
    pub id: Ulid,
    pub customer: Customer,
    pub range: DateRange,
    pub cart: Cart,
    pub total: f64,
    pub status: ReservationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl ConfirmedReservation {
    /// Only validated reservations consume stock.
    pub fn counts_as_demand(&self) -> bool {
        self.status == ReservationStatus::Validated
    }
}

// ── Derived views ────────────────────────────────────────────────

/// An item together with its free quantity for the active candidate range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAvailability {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub available_quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub subtotal: f64,
    pub total: f64,
}

/// Result of re-checking the cart against fresh availability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub changed: bool,
    pub cart: Cart,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = DateRange::new(d("2024-06-01"), d("2024-06-03"));
        let b = DateRange::new(d("2024-06-03"), d("2024-06-05"));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn overlap_equal_and_nested() {
        let outer = DateRange::new(d("2024-06-01"), d("2024-06-10"));
        let inner = DateRange::new(d("2024-06-04"), d("2024-06-04"));
        assert!(outer.overlaps(&outer));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        let a = DateRange::new(d("2024-06-01"), d("2024-06-03"));
        let b = DateRange::new(d("2024-06-04"), d("2024-06-05"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn candidate_parse_fallbacks() {
        assert_eq!(CandidateRange::parse("", "2024-06-03"), CandidateRange::Unconstrained);
        assert_eq!(CandidateRange::parse("2024-06-01", ""), CandidateRange::Unconstrained);
        assert_eq!(CandidateRange::parse("junk", "2024-06-03"), CandidateRange::Unconstrained);
        assert_eq!(CandidateRange::parse("2024-06-05", "2024-06-01"), CandidateRange::Unconstrained);
        assert_eq!(
            CandidateRange::parse(" 2024-06-01 ", "2024-06-03"),
            CandidateRange::Constrained(DateRange::new(d("2024-06-01"), d("2024-06-03")))
        );
    }

    #[test]
    fn slug_from_name() {
        assert_eq!(slugify("Event  Chairs"), "event-chairs");
        assert_eq!(slugify(" Round Table Cloth "), "round-table-cloth");
    }

    #[test]
    fn customer_missing_field_reports_first_blank() {
        let mut c = Customer {
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            phone: "555".into(),
            email: "ana@example.com".into(),
            event_address: "  ".into(),
            needs_transport: false,
        };
        assert_eq!(c.missing_field(), Some("event_address"));
        c.event_address = "Main St 1".into();
        assert_eq!(c.missing_field(), None);
    }

    #[test]
    fn status_and_category_parse() {
        assert_eq!("Validated".parse::<ReservationStatus>(), Ok(ReservationStatus::Validated));
        assert!("approved".parse::<ReservationStatus>().is_err());
        assert_eq!("linen".parse::<Category>(), Ok(Category::Linen));
        assert_eq!("mobiliario".parse::<Category>(), Ok(Category::Furniture));
    }
}

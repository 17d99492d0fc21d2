//! Monthly aggregation of a customer's ledger: month parsing, the half-open
//! month window, and total computation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::ledger::{EntryKind, MilkEntry};

/// A calendar month in the external `YYYY-MM` representation (month 1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

fn month_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("month pattern is valid"))
}

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!(
                "month must be between 01 and 12 (got {month:02})"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The first day of the month (inclusive lower bound of the window).
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("month is validated")
    }

    /// The first day of the following month (exclusive upper bound).
    /// December rolls over into January of the next year.
    pub fn next_first_day(self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).expect("month is validated")
    }

    /// Whether a calendar day falls inside `[first_day, next_first_day)`.
    pub fn contains(self, day: NaiveDate) -> bool {
        day >= self.first_day() && day < self.next_first_day()
    }

    /// Human-readable label for document headers, e.g. `"January 2024"`.
    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl FromStr for BillingMonth {
    type Err = CoreError;

    /// Parse the strict external `YYYY-MM` form. Anything looser
    /// (`2024-1`, trailing text, a full date) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = month_pattern()
            .captures(s)
            .ok_or_else(|| CoreError::Validation("month must be YYYY-MM".into()))?;
        let year: i32 = caps[1].parse().expect("matched digits");
        let month: u32 = caps[2].parse().expect("matched digits");
        Self::new(year, month)
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The aggregation result a bill is rendered from.
///
/// `entries` is sorted ascending by date; totals are final and must not be
/// recomputed by the renderer.
#[derive(Debug, Clone)]
pub struct MonthlyStatement {
    pub month: BillingMonth,
    pub entries: Vec<MilkEntry>,
    pub total_litres: Decimal,
    pub total_amount: Decimal,
}

/// Select the month's entries and compute totals.
///
/// Entries outside `[first-of-month, first-of-next-month)` are dropped.
/// Leave days contribute nothing; a delivery contributes its quantity and
/// total only when positive, so blank or non-positive measures are excluded
/// from the sums rather than treated as zero.
pub fn aggregate_month(month: BillingMonth, entries: Vec<MilkEntry>) -> MonthlyStatement {
    let mut entries: Vec<MilkEntry> = entries
        .into_iter()
        .filter(|e| month.contains(e.date))
        .collect();
    entries.sort_by_key(|e| e.date);

    let mut total_litres = Decimal::ZERO;
    let mut total_amount = Decimal::ZERO;
    for entry in &entries {
        if let EntryKind::Delivery(d) = &entry.kind {
            if d.quantity > Decimal::ZERO {
                total_litres += d.quantity;
            }
            if d.total > Decimal::ZERO {
                total_amount += d.total;
            }
        }
    }

    MonthlyStatement {
        month,
        entries,
        total_litres,
        total_amount,
    }
}

/// Attachment filename for a rendered bill: the customer's display name with
/// whitespace collapsed to `_`, plus the month.
pub fn bill_file_name(customer_name: &str, month: BillingMonth) -> String {
    let collapsed: Vec<&str> = customer_name.split_whitespace().collect();
    let name = if collapsed.is_empty() {
        "customer".to_string()
    } else {
        collapsed.join("_")
    };
    format!("bill-{name}-{month}.pdf")
}

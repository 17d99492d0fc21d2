//! Milk-ledger row model and insert DTO.
//!
//! The row keeps the six measure/meta columns nullable so both variants fit
//! one table; a CHECK constraint guarantees rows are either fully populated
//! (delivery) or fully blank (leave). Classification back into the typed
//! [`EntryKind`] happens in [`MilkEntryRow::into_entry`].

use chrono::NaiveDate;
use milkbook_core::error::CoreError;
use milkbook_core::ledger::{DeliveryEntry, EntryKind, MilkEntry};
use milkbook_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Raw row from the `milk_entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct MilkEntryRow {
    pub id: DbId,
    pub customer_id: DbId,
    pub entry_date: NaiveDate,
    pub quantity: Option<Decimal>,
    pub price_per_litre: Option<Decimal>,
    pub total: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub milk_type: Option<String>,
    pub sent: Option<bool>,
    pub created_at: Timestamp,
}

impl MilkEntryRow {
    /// Classify the raw columns into the typed entry.
    pub fn into_entry(self) -> Result<MilkEntry, CoreError> {
        let kind = EntryKind::from_fields(
            self.quantity,
            self.price_per_litre,
            self.total,
            self.fat,
            self.milk_type.as_deref(),
            self.sent,
        )?;
        Ok(MilkEntry {
            id: self.id,
            date: self.entry_date,
            kind,
        })
    }
}

/// Insert DTO for one ledger day. Built through the two constructors so the
/// all-or-nothing column invariant cannot be violated from Rust.
#[derive(Debug, Clone)]
pub struct NewEntryRow {
    pub customer_id: DbId,
    pub entry_date: NaiveDate,
    pub quantity: Option<Decimal>,
    pub price_per_litre: Option<Decimal>,
    pub total: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub milk_type: Option<String>,
    pub sent: Option<bool>,
}

impl NewEntryRow {
    pub fn delivery(customer_id: DbId, entry_date: NaiveDate, fields: &DeliveryEntry) -> Self {
        Self {
            customer_id,
            entry_date,
            quantity: Some(fields.quantity),
            price_per_litre: Some(fields.price_per_litre),
            total: Some(fields.total),
            fat: Some(fields.fat),
            milk_type: Some(fields.milk_type.as_str().to_string()),
            sent: Some(fields.sent),
        }
    }

    pub fn leave(customer_id: DbId, entry_date: NaiveDate) -> Self {
        Self {
            customer_id,
            entry_date,
            quantity: None,
            price_per_litre: None,
            total: None,
            fat: None,
            milk_type: None,
            sent: None,
        }
    }
}

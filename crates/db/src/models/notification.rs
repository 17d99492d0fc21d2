//! Notification log model and DTOs.

use chrono::NaiveDate;
use milkbook_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// What a notification records: a delivery entry was written (`send`) or a
/// leave day was marked (`leave`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Send,
    Leave,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Send => "send",
            NotificationKind::Leave => "leave",
        }
    }
}

/// A row from the `notifications` table: an immutable snapshot of one ledger
/// mutation. `is_read` is stored but currently unused by any flow.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub customer_id: DbId,
    pub seller_id: DbId,
    pub kind: String,
    pub entry_id: Option<DbId>,
    pub entry_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub quantity: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_per_litre: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub fat: Option<Decimal>,
    pub milk_type: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting one notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub customer_id: DbId,
    pub seller_id: DbId,
    pub kind: NotificationKind,
    pub entry_id: Option<DbId>,
    pub entry_date: NaiveDate,
    /// Measure snapshot; all `None` for a leave.
    pub quantity: Option<Decimal>,
    pub price_per_litre: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub milk_type: Option<String>,
}

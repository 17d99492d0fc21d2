//! Daily milk-ledger entries: variants, construction-time validation, and
//! calendar-day normalization.
//!
//! A ledger day holds either a [`DeliveryEntry`] (all measure fields present,
//! validated at construction) or a leave marker (all measure fields absent).
//! The two are modelled as an explicit [`EntryKind`] so that leave entries
//! never pass through numeric validation and delivery entries always do.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Money and derived totals are kept at two decimal places.
pub const MONEY_SCALE: u32 = 2;

// ---------------------------------------------------------------------------
// Milk type
// ---------------------------------------------------------------------------

/// The kind of milk delivered. Stored lowercase (`cow`, `buffalo`, `mix`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    Cow,
    Buffalo,
    Mix,
}

impl MilkType {
    pub fn as_str(self) -> &'static str {
        match self {
            MilkType::Cow => "cow",
            MilkType::Buffalo => "buffalo",
            MilkType::Mix => "mix",
        }
    }
}

impl Default for MilkType {
    /// Entries that do not state a type default to cow's milk.
    fn default() -> Self {
        MilkType::Cow
    }
}

impl fmt::Display for MilkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cow" => Ok(MilkType::Cow),
            "buffalo" => Ok(MilkType::Buffalo),
            "mix" => Ok(MilkType::Mix),
            other => Err(CoreError::Validation(format!(
                "type must be one of cow, buffalo, mix (got '{other}')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry variants
// ---------------------------------------------------------------------------

/// Measure and meta fields of a delivery day. Always fully populated;
/// `total` is derived at construction and never recomputed downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEntry {
    pub quantity: Decimal,
    pub price_per_litre: Decimal,
    /// `round(quantity * price_per_litre, 2)`.
    pub total: Decimal,
    pub fat: Decimal,
    pub milk_type: MilkType,
    /// Delivery-acknowledgement flag.
    pub sent: bool,
}

/// A ledger day is either a delivery or a leave marker.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Delivery(DeliveryEntry),
    Leave,
}

impl EntryKind {
    /// Classify a stored row from its raw fields.
    ///
    /// A row is a leave iff **all six** measure/meta fields are absent; a row
    /// with all six present is a delivery. This is computed from the fields
    /// rather than a stored flag so historically-blank rows classify the same
    /// way regardless of how they were produced. Mixed rows cannot be written
    /// through this crate and are reported as internal corruption.
    pub fn from_fields(
        quantity: Option<Decimal>,
        price_per_litre: Option<Decimal>,
        total: Option<Decimal>,
        fat: Option<Decimal>,
        milk_type: Option<&str>,
        sent: Option<bool>,
    ) -> Result<Self, CoreError> {
        let absent = quantity.is_none()
            && price_per_litre.is_none()
            && total.is_none()
            && fat.is_none()
            && milk_type.is_none()
            && sent.is_none();
        if absent {
            return Ok(EntryKind::Leave);
        }

        match (quantity, price_per_litre, total, fat, milk_type, sent) {
            (Some(quantity), Some(price_per_litre), Some(total), Some(fat), Some(ty), Some(sent)) => {
                let milk_type = MilkType::from_str(ty)
                    .map_err(|_| CoreError::Internal(format!("stored milk type '{ty}' is invalid")))?;
                Ok(EntryKind::Delivery(DeliveryEntry {
                    quantity,
                    price_per_litre,
                    total,
                    fat,
                    milk_type,
                    sent,
                }))
            }
            _ => Err(CoreError::Internal(
                "ledger row is neither a delivery nor a leave (partially blank)".into(),
            )),
        }
    }

    pub fn is_leave(&self) -> bool {
        matches!(self, EntryKind::Leave)
    }

    pub fn as_delivery(&self) -> Option<&DeliveryEntry> {
        match self {
            EntryKind::Delivery(d) => Some(d),
            EntryKind::Leave => None,
        }
    }
}

/// One stored ledger entry: a calendar day plus its variant.
#[derive(Debug, Clone, PartialEq)]
pub struct MilkEntry {
    pub id: DbId,
    /// The calendar day (already normalized to a UTC date).
    pub date: NaiveDate,
    pub kind: EntryKind,
}

impl MilkEntry {
    pub fn is_leave(&self) -> bool {
        self.kind.is_leave()
    }
}

// ---------------------------------------------------------------------------
// Delivery construction
// ---------------------------------------------------------------------------

/// Validated input for a new delivery entry.
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub quantity: Decimal,
    pub price_per_litre: Decimal,
    pub fat: Decimal,
    pub milk_type: MilkType,
    pub sent: bool,
}

impl NewDelivery {
    /// Check the numeric preconditions, naming the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::Validation("quantity must be > 0".into()));
        }
        if self.price_per_litre <= Decimal::ZERO {
            return Err(CoreError::Validation("pricePerLitre must be > 0".into()));
        }
        if self.fat < Decimal::ZERO {
            return Err(CoreError::Validation("fat must be >= 0".into()));
        }
        Ok(())
    }

    /// Validate and build the full delivery fields with the derived total.
    pub fn into_delivery(self) -> Result<DeliveryEntry, CoreError> {
        self.validate()?;
        let total = round_money(self.quantity * self.price_per_litre);
        Ok(DeliveryEntry {
            quantity: self.quantity,
            price_per_litre: self.price_per_litre,
            total,
            fat: self.fat,
            milk_type: self.milk_type,
            sent: self.sent,
        })
    }
}

/// Round a monetary amount to [`MONEY_SCALE`] places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Calendar-day normalization
// ---------------------------------------------------------------------------

/// Parse a client-supplied entry date and normalize it to a UTC calendar day.
///
/// Accepts plain `YYYY-MM-DD` or an RFC 3339 timestamp (whose UTC calendar
/// day is taken; the time of day carries no meaning in the ledger).
pub fn parse_entry_day(input: &str) -> Result<NaiveDate, CoreError> {
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.to_utc().date_naive());
    }
    Err(CoreError::Validation(format!(
        "date must be YYYY-MM-DD or an RFC 3339 timestamp (got '{input}')"
    )))
}

/// The first day a customer may have ledger entries for.
pub fn registration_day(registered_at: Timestamp) -> NaiveDate {
    registered_at.date_naive()
}

/// Reject entry days that precede the customer's registration day.
pub fn check_not_before_registration(
    day: NaiveDate,
    registered_at: Timestamp,
) -> Result<(), CoreError> {
    if day < registration_day(registered_at) {
        return Err(CoreError::Validation(
            "date is before the customer's registration date".into(),
        ));
    }
    Ok(())
}

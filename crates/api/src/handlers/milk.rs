//! Handlers for the per-customer milk ledger: upsert a day's delivery, mark
//! a leave day, and delete entries by id or by date.
//!
//! All endpoints are seller-scoped: the customer must belong to the
//! authenticated seller, and a foreign customer is reported as not found.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use milkbook_core::error::CoreError;
use milkbook_core::ledger::{
    check_not_before_registration, parse_entry_day, MilkEntry, MilkType, NewDelivery,
};
use milkbook_core::types::DbId;
use milkbook_db::models::customer::Customer;
use milkbook_db::models::milk_entry::NewEntryRow;
use milkbook_db::models::notification::{CreateNotification, NotificationKind};
use milkbook_db::repositories::{CustomerRepo, MilkEntryRepo, NotificationRepo};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /customers/{id}/milk`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEntryRequest {
    /// `YYYY-MM-DD` (or an RFC 3339 timestamp, normalized to its UTC day).
    pub date: String,
    pub quantity: f64,
    pub price_per_litre: f64,
    pub fat: f64,
    #[serde(rename = "type", default)]
    pub milk_type: MilkType,
    #[serde(default = "default_sent")]
    pub sent: bool,
}

fn default_sent() -> bool {
    true
}

/// Request body for `POST /customers/{id}/milk/leave`.
#[derive(Debug, Deserialize)]
pub struct MarkLeaveRequest {
    pub date: String,
}

/// Query parameters for `DELETE /customers/{id}/milk`.
#[derive(Debug, Deserialize)]
pub struct DeleteByDateQuery {
    pub date: Option<String>,
}

/// One ledger entry as returned to clients. Leave days serialize with all
/// measure fields `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: DbId,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub quantity: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_per_litre: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub fat: Option<Decimal>,
    #[serde(rename = "type")]
    pub milk_type: Option<MilkType>,
    pub sent: Option<bool>,
}

impl From<MilkEntry> for EntryResponse {
    fn from(entry: MilkEntry) -> Self {
        let delivery = entry.kind.as_delivery();
        Self {
            id: entry.id,
            date: entry.date,
            quantity: delivery.map(|d| d.quantity),
            price_per_litre: delivery.map(|d| d.price_per_litre),
            total: delivery.map(|d| d.total),
            fat: delivery.map(|d| d.fat),
            milk_type: delivery.map(|d| d.milk_type),
            sent: delivery.map(|d| d.sent),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/customers/{id}/milk
///
/// Save one day's delivery. A second write for the same day replaces the
/// first (last write wins), whether the prior entry was a delivery or a leave.
pub async fn upsert_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Json(input): Json<UpsertEntryRequest>,
) -> AppResult<Json<DataResponse<EntryResponse>>> {
    let seller_id = auth.require_seller()?;
    let customer = find_owned_customer(&state, customer_id, seller_id).await?;

    let day = parse_entry_day(&input.date)?;
    check_not_before_registration(day, customer.created_at)?;

    let delivery = NewDelivery {
        quantity: decimal_field(input.quantity, "quantity")?,
        price_per_litre: decimal_field(input.price_per_litre, "pricePerLitre")?,
        fat: decimal_field(input.fat, "fat")?,
        milk_type: input.milk_type,
        sent: input.sent,
    }
    .into_delivery()?;

    let row =
        MilkEntryRepo::replace_for_day(&state.pool, &NewEntryRow::delivery(customer.id, day, &delivery))
            .await?;
    let entry = row.into_entry().map_err(AppError::Core)?;

    tracing::info!(
        customer_id = customer.id,
        seller_id,
        date = %day,
        "Milk entry saved"
    );

    // Best-effort: a notification failure must not fail the upsert.
    let snapshot = CreateNotification {
        customer_id: customer.id,
        seller_id,
        kind: NotificationKind::Send,
        entry_id: Some(entry.id),
        entry_date: day,
        quantity: Some(delivery.quantity),
        price_per_litre: Some(delivery.price_per_litre),
        fat: Some(delivery.fat),
        milk_type: Some(delivery.milk_type.as_str().to_string()),
    };
    notify(&state, snapshot).await;

    Ok(Json(DataResponse { data: entry.into() }))
}

/// POST /api/v1/customers/{id}/milk/leave
///
/// Mark a day as leave: a blank entry with every measure field absent. Any
/// existing entry for that day is discarded, delivery included.
pub async fn mark_leave(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Json(input): Json<MarkLeaveRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<EntryResponse>>)> {
    let seller_id = auth.require_seller()?;
    let customer = find_owned_customer(&state, customer_id, seller_id).await?;

    let day = parse_entry_day(&input.date)?;
    check_not_before_registration(day, customer.created_at)?;

    let row = MilkEntryRepo::replace_for_day(&state.pool, &NewEntryRow::leave(customer.id, day))
        .await?;
    let entry = row.into_entry().map_err(AppError::Core)?;

    tracing::info!(customer_id = customer.id, seller_id, date = %day, "Leave marked");

    let snapshot = CreateNotification {
        customer_id: customer.id,
        seller_id,
        kind: NotificationKind::Leave,
        entry_id: Some(entry.id),
        entry_date: day,
        quantity: None,
        price_per_litre: None,
        fat: None,
        milk_type: None,
    };
    notify(&state, snapshot).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry.into() })))
}

/// DELETE /api/v1/customers/{id}/milk/{entry_id}
///
/// Delete one ledger entry by its id.
pub async fn delete_entry_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((customer_id, entry_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let seller_id = auth.require_seller()?;
    let customer = find_owned_customer(&state, customer_id, seller_id).await?;

    let deleted = MilkEntryRepo::delete_by_id(&state.pool, customer.id, entry_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Milk entry",
            id: entry_id,
        }));
    }

    tracing::info!(customer_id = customer.id, entry_id, "Milk entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/customers/{id}/milk?date=YYYY-MM-DD
///
/// Delete the ledger entry for one calendar day.
pub async fn delete_entry_by_date(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Query(params): Query<DeleteByDateQuery>,
) -> AppResult<impl IntoResponse> {
    let seller_id = auth.require_seller()?;
    let customer = find_owned_customer(&state, customer_id, seller_id).await?;

    let date = params
        .date
        .ok_or_else(|| AppError::BadRequest("Provide entryId or date".into()))?;
    let day = parse_entry_day(&date)?;

    let deleted = MilkEntryRepo::delete_by_date(&state.pool, customer.id, day).await?;
    if !deleted {
        return Err(AppError::NotFound("Milk entry not found for that date".into()));
    }

    tracing::info!(customer_id = customer.id, date = %day, "Milk entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a customer owned by the seller. A customer that exists but
/// belongs to someone else is reported exactly like a missing one.
pub(crate) async fn find_owned_customer(
    state: &AppState,
    customer_id: DbId,
    seller_id: DbId,
) -> AppResult<Customer> {
    CustomerRepo::find_owned(&state.pool, customer_id, seller_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        }))
}

/// Convert a JSON number into a `Decimal`, rejecting NaN/infinity.
fn decimal_field(value: f64, field: &str) -> Result<Decimal, AppError> {
    Decimal::from_f64(value).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "{field} must be a finite number"
        )))
    })
}

/// Insert a notification and trim the customer's log to the configured cap.
///
/// Failures are logged and swallowed; the ledger write has already
/// succeeded and must still be reported as such.
async fn notify(state: &AppState, snapshot: CreateNotification) {
    let customer_id = snapshot.customer_id;
    if let Err(e) = NotificationRepo::create(&state.pool, &snapshot).await {
        tracing::warn!(customer_id, error = %e, "Notification insert failed");
        return;
    }
    if let Err(e) =
        NotificationRepo::trim_to_recent(&state.pool, customer_id, state.config.notification_keep)
            .await
    {
        tracing::warn!(customer_id, error = %e, "Notification retention trim failed");
    }
}

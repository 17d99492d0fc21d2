//! Handler for the monthly bill download.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use milkbook_core::billing::{aggregate_month, bill_file_name, BillingMonth};
use milkbook_core::error::CoreError;
use milkbook_core::types::DbId;
use milkbook_db::repositories::{MilkEntryRepo, SellerRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::milk::find_owned_customer;
use crate::middleware::auth::AuthUser;
use crate::pdf;
use crate::state::AppState;

/// Query parameters for `GET /customers/{id}/bill`.
#[derive(Debug, Deserialize)]
pub struct BillQuery {
    /// Strict `YYYY-MM`.
    pub month: Option<String>,
}

/// GET /api/v1/customers/{id}/bill?month=YYYY-MM
///
/// Aggregate the customer's ledger for one calendar month and stream the
/// rendered PDF as an attachment. The renderer only formats what the
/// aggregation produced; totals are not recomputed here.
pub async fn monthly_bill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Query(params): Query<BillQuery>,
) -> AppResult<impl IntoResponse> {
    let seller_id = auth.require_seller()?;

    let month: BillingMonth = params
        .month
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("month must be YYYY-MM".into())))?
        .trim()
        .parse()?;

    let customer = find_owned_customer(&state, customer_id, seller_id).await?;
    let seller = SellerRepo::find_basic(&state.pool, seller_id).await?;

    let rows = MilkEntryRepo::list_for_range(
        &state.pool,
        customer.id,
        month.first_day(),
        month.next_first_day(),
    )
    .await?;
    let entries = rows
        .into_iter()
        .map(|row| row.into_entry())
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::Core)?;

    let statement = aggregate_month(month, entries);

    let bytes = pdf::render_monthly_bill(
        seller.as_ref(),
        &customer.name,
        &customer.phone,
        &statement,
    )
    .map_err(|e| AppError::InternalError(format!("Bill rendering error: {e}")))?;

    tracing::info!(
        customer_id = customer.id,
        seller_id,
        month = %month,
        rows = statement.entries.len(),
        "Monthly bill rendered"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        bill_file_name(&customer.name, month)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

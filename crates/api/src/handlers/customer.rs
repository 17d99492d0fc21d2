//! Handlers for customer accounts: seller-side management plus the
//! customer-facing profile and notification feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use milkbook_core::error::CoreError;
use milkbook_core::types::DbId;
use milkbook_db::models::customer::{CreateCustomer, CustomerResponse};
use milkbook_db::models::notification::Notification;
use milkbook_db::models::seller::SellerBasic;
use milkbook_db::repositories::{CustomerRepo, MilkEntryRepo, NotificationRepo, SellerRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::milk::EntryResponse;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for the customer notification feed.
const MAX_NOTIFICATION_LIMIT: i64 = 50;

/// Default page size for the customer notification feed.
const DEFAULT_NOTIFICATION_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /customers`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    pub address: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Request body for `PATCH /customers/{id}/active`.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// Query parameters for `GET /me/notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Maximum number of results. Defaults to 10, capped at 50.
    pub limit: Option<i64>,
}

/// Response body for `GET /me`: the customer's own profile, their full
/// ledger, and their seller's display identity.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub customer: CustomerResponse,
    pub entries: Vec<EntryResponse>,
    pub seller: Option<SellerBasic>,
}

// ---------------------------------------------------------------------------
// Seller-side management
// ---------------------------------------------------------------------------

/// POST /api/v1/customers
///
/// Register a customer under the authenticated seller. Phone numbers are
/// globally unique across customers.
pub async fn create_customer(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CustomerResponse>>)> {
    let seller_id = auth.require_seller()?;

    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if CustomerRepo::find_by_phone(&state.pool, &input.phone).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Phone already registered".into(),
        )));
    }

    let password_hash = crate::auth::password::hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let customer = CustomerRepo::create(
        &state.pool,
        &CreateCustomer {
            seller_id,
            name: input.name,
            phone: input.phone,
            address: input.address,
            password_hash,
        },
    )
    .await?;

    tracing::info!(customer_id = customer.id, seller_id, "Customer created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: customer.into(),
        }),
    ))
}

/// GET /api/v1/customers
///
/// List the authenticated seller's customers, newest first.
pub async fn list_customers(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CustomerResponse>>>> {
    let seller_id = auth.require_seller()?;

    let customers = CustomerRepo::list_for_seller(&state.pool, seller_id).await?;
    let data = customers.into_iter().map(CustomerResponse::from).collect();

    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/customers/{id}/active
///
/// Enable or disable a customer account.
pub async fn set_customer_active(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
    Json(input): Json<SetActiveRequest>,
) -> AppResult<Json<DataResponse<CustomerResponse>>> {
    let seller_id = auth.require_seller()?;

    let customer = CustomerRepo::set_active(&state.pool, customer_id, seller_id, input.is_active)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        }))?;

    tracing::info!(
        customer_id,
        seller_id,
        is_active = input.is_active,
        "Customer active flag updated"
    );

    Ok(Json(DataResponse {
        data: customer.into(),
    }))
}

/// DELETE /api/v1/customers/{id}
///
/// Hard-delete a customer along with their ledger and notifications.
pub async fn delete_customer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let seller_id = auth.require_seller()?;

    let deleted = CustomerRepo::delete_owned(&state.pool, customer_id, seller_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        }));
    }

    tracing::info!(customer_id, seller_id, "Customer deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Customer-facing reads
// ---------------------------------------------------------------------------

/// GET /api/v1/me
///
/// The authenticated customer's profile, full ledger, and the display
/// identity (name, phone) of their seller.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let customer_id = auth.require_customer()?;

    let customer = CustomerRepo::find_by_id(&state.pool, customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: customer_id,
        }))?;

    let seller = SellerRepo::find_basic(&state.pool, customer.seller_id).await?;

    let rows = MilkEntryRepo::list_for_customer(&state.pool, customer.id).await?;
    let entries = rows
        .into_iter()
        .map(|row| row.into_entry().map(EntryResponse::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::Core)?;

    Ok(Json(DataResponse {
        data: MeResponse {
            customer: customer.into(),
            entries,
            seller,
        },
    }))
}

/// GET /api/v1/me/notifications?limit=10
///
/// The authenticated customer's notification feed, most recent first.
pub async fn my_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let customer_id = auth.require_customer()?;

    let limit = params
        .limit
        .unwrap_or(DEFAULT_NOTIFICATION_LIMIT)
        .clamp(1, MAX_NOTIFICATION_LIMIT);

    let notifications = NotificationRepo::list_for_customer(&state.pool, customer_id, limit).await?;

    Ok(Json(DataResponse {
        data: notifications,
    }))
}

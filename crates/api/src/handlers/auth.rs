//! Handlers for the `/auth` resource (seller register/login, customer login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use milkbook_core::error::CoreError;
use milkbook_db::models::customer::CustomerResponse;
use milkbook_db::models::seller::{CreateSeller, Seller, SellerResponse};
use milkbook_db::repositories::{CustomerRepo, SellerRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_token, ROLE_CUSTOMER, ROLE_SELLER};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/seller/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterSellerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub address: Option<String>,
}

/// Request body for `POST /auth/seller/login`.
///
/// Accepts `phone`, `email`, or a combined `identifier` (treated as an email
/// when it contains `@`, otherwise as a phone number).
#[derive(Debug, Deserialize)]
pub struct LoginSellerRequest {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub identifier: Option<String>,
    pub password: String,
}

/// Request body for `POST /auth/customer/login`.
#[derive(Debug, Deserialize)]
pub struct LoginCustomerRequest {
    pub phone: String,
    pub password: String,
}

/// Successful seller authentication response.
#[derive(Debug, Serialize)]
pub struct SellerAuthResponse {
    pub token: String,
    pub seller: SellerResponse,
}

/// Successful customer authentication response.
#[derive(Debug, Serialize)]
pub struct CustomerAuthResponse {
    pub token: String,
    pub customer: CustomerResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/seller/register
///
/// Create a seller account. Phone (and email, when given) must be unique.
pub async fn register_seller(
    State(state): State<AppState>,
    Json(input): Json<RegisterSellerRequest>,
) -> AppResult<(StatusCode, Json<SellerAuthResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    // Uniqueness guards. The uq_ constraints remain the backstop under races.
    if SellerRepo::find_by_phone(&state.pool, &input.phone).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Phone already registered".into(),
        )));
    }
    if let Some(email) = &input.email {
        if SellerRepo::find_by_email(&state.pool, email).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(
                "Email already registered".into(),
            )));
        }
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let seller = SellerRepo::create(
        &state.pool,
        &CreateSeller {
            name: input.name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            password_hash,
        },
    )
    .await?;

    tracing::info!(seller_id = seller.id, "Seller registered");

    let response = seller_auth_response(&state, seller)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/seller/login
///
/// Authenticate a seller with phone or email plus password.
pub async fn login_seller(
    State(state): State<AppState>,
    Json(input): Json<LoginSellerRequest>,
) -> AppResult<Json<SellerAuthResponse>> {
    let seller = match (&input.phone, &input.email, &input.identifier) {
        (Some(phone), _, _) => SellerRepo::find_by_phone(&state.pool, phone).await?,
        (None, Some(email), _) => SellerRepo::find_by_email(&state.pool, email).await?,
        (None, None, Some(identifier)) => {
            if identifier.contains('@') {
                SellerRepo::find_by_email(&state.pool, identifier).await?
            } else {
                SellerRepo::find_by_phone(&state.pool, identifier).await?
            }
        }
        (None, None, None) => {
            return Err(AppError::BadRequest(
                "Provide phone or email along with password".into(),
            ));
        }
    };

    // Uniform message whether the account is missing or the password is wrong.
    let seller = seller.ok_or_else(invalid_credentials)?;

    if !seller.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account disabled".into(),
        )));
    }

    let ok = verify_password(&input.password, &seller.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !ok {
        return Err(invalid_credentials());
    }

    let response = seller_auth_response(&state, seller)?;
    Ok(Json(response))
}

/// POST /api/v1/auth/customer/login
///
/// Authenticate a customer with phone plus password.
pub async fn login_customer(
    State(state): State<AppState>,
    Json(input): Json<LoginCustomerRequest>,
) -> AppResult<Json<CustomerAuthResponse>> {
    let customer = CustomerRepo::find_by_phone(&state.pool, &input.phone)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !customer.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account disabled".into(),
        )));
    }

    let ok = verify_password(&input.password, &customer.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !ok {
        return Err(invalid_credentials());
    }

    let token = generate_token(customer.id, ROLE_CUSTOMER, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(CustomerAuthResponse {
        token,
        customer: customer.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

/// Generate a seller token and build the auth response.
fn seller_auth_response(state: &AppState, seller: Seller) -> AppResult<SellerAuthResponse> {
    let token = generate_token(seller.id, ROLE_SELLER, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(SellerAuthResponse {
        token,
        seller: seller.into(),
    })
}

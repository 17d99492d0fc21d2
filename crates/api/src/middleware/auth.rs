//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use milkbook_core::error::CoreError;
use milkbook_core::types::DbId;

use crate::auth::jwt::{validate_token, ROLE_CUSTOMER, ROLE_SELLER};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated principal extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication, then narrow it with [`AuthUser::require_seller`] or
/// [`AuthUser::require_customer`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The bearer's internal database id (from `claims.sub`).
    pub subject_id: DbId,
    /// The bearer's role (`"seller"` or `"customer"`).
    pub role: String,
}

impl AuthUser {
    /// The seller id, or 403 when the token belongs to a customer.
    pub fn require_seller(&self) -> Result<DbId, AppError> {
        if self.role == ROLE_SELLER {
            Ok(self.subject_id)
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "This operation is available to sellers only".into(),
            )))
        }
    }

    /// The customer id, or 403 when the token belongs to a seller.
    pub fn require_customer(&self) -> Result<DbId, AppError> {
        if self.role == ROLE_CUSTOMER {
            Ok(self.subject_id)
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "This operation is available to customers only".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            subject_id: claims.sub,
            role: claims.role,
        })
    }
}

//! Seller entity model and DTOs.

use milkbook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full seller row from the `sellers` table.
///
/// Contains the password hash -- never serialize this to API responses;
/// use [`SellerResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Seller {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe seller representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct SellerResponse {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<Seller> for SellerResponse {
    fn from(s: Seller) -> Self {
        Self {
            id: s.id,
            name: s.name,
            phone: s.phone,
            email: s.email,
            address: s.address,
            is_active: s.is_active,
            created_at: s.created_at,
        }
    }
}

/// Minimal seller identity joined into customer-facing views and bills.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SellerBasic {
    pub id: DbId,
    pub name: String,
    pub phone: String,
}

/// DTO for inserting a new seller. The password is already hashed.
#[derive(Debug)]
pub struct CreateSeller {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
}

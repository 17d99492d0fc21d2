//! Customer entity model and DTOs.

use milkbook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full customer row from the `customers` table.
///
/// `created_at` doubles as the registration boundary: ledger entries dated
/// before it are rejected. Contains the password hash -- use
/// [`CustomerResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    pub id: DbId,
    pub seller_id: DbId,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe customer representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: DbId,
    pub seller_id: DbId,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            seller_id: c.seller_id,
            name: c.name,
            phone: c.phone,
            address: c.address,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}

/// DTO for inserting a new customer. The password is already hashed.
#[derive(Debug)]
pub struct CreateCustomer {
    pub seller_id: DbId,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub password_hash: String,
}

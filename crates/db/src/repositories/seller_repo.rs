//! Repository for the `sellers` table.

use milkbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::seller::{CreateSeller, Seller, SellerBasic};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, phone, email, address, password_hash, is_active, created_at, updated_at";

/// Provides account operations for sellers.
pub struct SellerRepo;

impl SellerRepo {
    /// Insert a new seller, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSeller) -> Result<Seller, sqlx::Error> {
        let query = format!(
            "INSERT INTO sellers (name, phone, email, address, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Seller>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a seller by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Seller>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sellers WHERE id = $1");
        sqlx::query_as::<_, Seller>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a seller by phone number.
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Seller>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sellers WHERE phone = $1");
        sqlx::query_as::<_, Seller>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Find a seller by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Seller>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sellers WHERE email = $1");
        sqlx::query_as::<_, Seller>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Minimal identity (name, phone) for display in bills and customer views.
    pub async fn find_basic(pool: &PgPool, id: DbId) -> Result<Option<SellerBasic>, sqlx::Error> {
        sqlx::query_as::<_, SellerBasic>("SELECT id, name, phone FROM sellers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

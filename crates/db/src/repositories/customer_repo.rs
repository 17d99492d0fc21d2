//! Repository for the `customers` table.
//!
//! Every seller-scoped method filters on `seller_id` in the query itself, so
//! a customer owned by another seller is indistinguishable from a missing one.

use milkbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, seller_id, name, phone, address, password_hash, is_active, created_at, updated_at";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (seller_id, name, phone, address, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(input.seller_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by internal ID (no ownership filter; customer-facing).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a customer by phone number (global: phone is unique).
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE phone = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Find a customer only if it belongs to the given seller.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        seller_id: DbId,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1 AND seller_id = $2");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(seller_id)
            .fetch_optional(pool)
            .await
    }

    /// List a seller's customers, newest registrations first.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: DbId,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers WHERE seller_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(seller_id)
            .fetch_all(pool)
            .await
    }

    /// Set the active flag. Returns the updated row, or `None` when the
    /// customer does not belong to the seller.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        seller_id: DbId,
        is_active: bool,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET is_active = $3, updated_at = NOW()
             WHERE id = $1 AND seller_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(seller_id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a customer (the ledger and notifications cascade).
    /// Returns `true` if a row owned by the seller was removed.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        seller_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND seller_id = $2")
            .bind(id)
            .bind(seller_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

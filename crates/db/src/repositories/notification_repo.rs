//! Repository for the `notifications` table.

use milkbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, customer_id, seller_id, kind, entry_id, entry_date, \
                       quantity, price_per_litre, fat, milk_type, is_read, created_at";

/// Provides insert, listing, and retention trimming for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &CreateNotification) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications
                (customer_id, seller_id, kind, entry_id, entry_date,
                 quantity, price_per_litre, fat, milk_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(input.customer_id)
        .bind(input.seller_id)
        .bind(input.kind.as_str())
        .bind(input.entry_id)
        .bind(input.entry_date)
        .bind(input.quantity)
        .bind(input.price_per_litre)
        .bind(input.fat)
        .bind(&input.milk_type)
        .fetch_one(pool)
        .await
    }

    /// Keep only the `keep` most recent notifications for a customer,
    /// deleting the rest. Returns the number of rows purged.
    ///
    /// Recency is creation order (`created_at`, then `id` as tiebreaker). A
    /// concurrent insert may briefly push the count past the cap; the next
    /// trim converges back below it.
    pub async fn trim_to_recent(
        pool: &PgPool,
        customer_id: DbId,
        keep: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM notifications
             WHERE customer_id = $1
               AND id NOT IN (
                   SELECT id FROM notifications
                   WHERE customer_id = $1
                   ORDER BY created_at DESC, id DESC
                   LIMIT $2
               )",
        )
        .bind(customer_id)
        .bind(keep)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a customer's notifications, most recent first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE customer_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(customer_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Number of notifications currently stored for a customer.
    pub async fn count_for_customer(pool: &PgPool, customer_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}

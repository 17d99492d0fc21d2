//! Repository for the `milk_entries` table (the per-customer daily ledger).

use chrono::NaiveDate;
use milkbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::milk_entry::{MilkEntryRow, NewEntryRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, entry_date, quantity, price_per_litre, total, \
                       fat, milk_type, sent, created_at";

/// Provides ledger operations for milk entries.
pub struct MilkEntryRepo;

impl MilkEntryRepo {
    /// Replace whatever the customer's ledger holds for the given day with a
    /// fresh row, returning it.
    ///
    /// Delete and insert run in one transaction so no interleaving can leave
    /// the day with zero or two entries; the `(customer_id, entry_date)`
    /// unique constraint backs the invariant against concurrent writers.
    /// The replacement row always gets a newly generated id.
    pub async fn replace_for_day(
        pool: &PgPool,
        input: &NewEntryRow,
    ) -> Result<MilkEntryRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM milk_entries WHERE customer_id = $1 AND entry_date = $2")
            .bind(input.customer_id)
            .bind(input.entry_date)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO milk_entries
                (customer_id, entry_date, quantity, price_per_litre, total, fat, milk_type, sent)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, MilkEntryRow>(&query)
            .bind(input.customer_id)
            .bind(input.entry_date)
            .bind(input.quantity)
            .bind(input.price_per_litre)
            .bind(input.total)
            .bind(input.fat)
            .bind(&input.milk_type)
            .bind(input.sent)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Delete one entry by its id. Returns `true` if a row was removed.
    pub async fn delete_by_id(
        pool: &PgPool,
        customer_id: DbId,
        entry_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milk_entries WHERE id = $1 AND customer_id = $2")
            .bind(entry_id)
            .bind(customer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the entry for one calendar day. Returns `true` if a row was removed.
    pub async fn delete_by_date(
        pool: &PgPool,
        customer_id: DbId,
        entry_date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM milk_entries WHERE customer_id = $1 AND entry_date = $2")
                .bind(customer_id)
                .bind(entry_date)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The customer's full ledger, oldest day first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<MilkEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milk_entries WHERE customer_id = $1 ORDER BY entry_date ASC"
        );
        sqlx::query_as::<_, MilkEntryRow>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Entries whose day falls in the half-open range `[start, end)`,
    /// ascending by day.
    pub async fn list_for_range(
        pool: &PgPool,
        customer_id: DbId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MilkEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milk_entries
             WHERE customer_id = $1 AND entry_date >= $2 AND entry_date < $3
             ORDER BY entry_date ASC"
        );
        sqlx::query_as::<_, MilkEntryRow>(&query)
            .bind(customer_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}

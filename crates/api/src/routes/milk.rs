//! Ledger and billing routes -- merged into the `/customers` nest.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bill, milk};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/milk",
            post(milk::upsert_entry).delete(milk::delete_entry_by_date),
        )
        .route("/{id}/milk/leave", post(milk::mark_leave))
        .route(
            "/{id}/milk/{entry_id}",
            axum::routing::delete(milk::delete_entry_by_id),
        )
        .route("/{id}/bill", get(bill::monthly_bill))
}

//! Route definitions.
//!
//! ```text
//! /health                                GET  health + db round-trip
//!
//! /api/v1/auth/seller/register           POST register (public)
//! /api/v1/auth/seller/login              POST login (public)
//! /api/v1/auth/customer/login            POST login (public)
//!
//! /api/v1/customers                      GET list, POST create (seller)
//! /api/v1/customers/{id}                 DELETE hard delete (seller)
//! /api/v1/customers/{id}/active          PATCH enable/disable (seller)
//! /api/v1/customers/{id}/milk            POST upsert day entry,
//!                                        DELETE by ?date= (seller)
//! /api/v1/customers/{id}/milk/leave      POST mark leave (seller)
//! /api/v1/customers/{id}/milk/{entry_id} DELETE by id (seller)
//! /api/v1/customers/{id}/bill            GET monthly PDF (seller)
//!
//! /api/v1/me                             GET profile + ledger (customer)
//! /api/v1/me/notifications               GET feed (customer)
//! ```

pub mod auth;
pub mod customer;
pub mod health;
pub mod me;
pub mod milk;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/customers", customer::router().merge(milk::router()))
        .nest("/me", me::router())
}

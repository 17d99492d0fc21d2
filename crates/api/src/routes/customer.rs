//! Customer management routes -- mounted at `/customers`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::customer;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customer::list_customers).post(customer::create_customer),
        )
        .route("/{id}", axum::routing::delete(customer::delete_customer))
        .route("/{id}/active", patch(customer::set_customer_active))
}

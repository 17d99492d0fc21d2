//! Customer-facing routes -- mounted at `/me`.

use axum::routing::get;
use axum::Router;

use crate::handlers::customer;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(customer::me))
        .route("/notifications", get(customer::my_notifications))
}

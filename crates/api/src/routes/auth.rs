//! Authentication routes -- mounted at `/auth`.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seller/register", post(auth::register_seller))
        .route("/seller/login", post(auth::login_seller))
        .route("/customer/login", post(auth::login_customer))
}

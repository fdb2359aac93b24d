use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Pages anyone can open without a session. `/membership/portal` and
/// `/membership/register` are public too, but a caller who already holds a token
/// is redirected from them to the dashboard.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::page))
        .route("/about", get(handlers::page))
        .route("/history", get(handlers::page))
        .route("/leadership", get(handlers::page))
        .route("/contact", get(handlers::page))
        // Membership tiers, plus the login and registration surfaces beneath them.
        .route("/membership", get(handlers::page))
        .route("/membership/portal", get(handlers::page))
        .route("/membership/register", get(handlers::page))
        // Landing page for role failures.
        .route("/unauthorized", get(handlers::page))
}

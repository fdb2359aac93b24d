use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Back-office areas. Each prefix is gated twice: once by its entry in the role
/// table and once by the guard's hardcoded area check.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(handlers::page))
        .route("/admin/{*section}", get(handlers::page))
        .route("/executive", get(handlers::page))
        .route("/executive/{*section}", get(handlers::page))
}

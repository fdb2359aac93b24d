use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// Member-only pages. The guard enforces, per path prefix:
/// - any valid session for `/dashboard` and `/dashboard/profile/update`,
/// - approved KYC for `/donate`, finance, donations and bank accounts,
/// - the matching role flag for everything listed in `policy::ROLE_PERMISSIONS`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::page))
        .route("/dashboard/profile/update", get(handlers::page))
        // Staff workspace.
        .route("/dashboard/projects", get(handlers::page))
        .route("/dashboard/tasks", get(handlers::page))
        .route("/dashboard/campaigns", get(handlers::page))
        // Finance: executive role and approved KYC.
        .route("/dashboard/finance", get(handlers::page))
        .route("/dashboard/finance/budgets", get(handlers::page))
        .route("/dashboard/finance/expenses", get(handlers::page))
        .route("/dashboard/bank-accounts", get(handlers::page))
        // Donor, partner and volunteer areas.
        .route("/dashboard/donations", get(handlers::page))
        .route("/dashboard/partnerships", get(handlers::page))
        .route("/dashboard/volunteering", get(handlers::page))
        // Admin-only sections inside the dashboard.
        .route("/dashboard/users", get(handlers::page))
        .route("/dashboard/settings", get(handlers::page))
        // Donation checkout. KYC-gated, no role needed.
        .route("/donate", get(handlers::page))
}

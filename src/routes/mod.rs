//! Router Module Index
//!
//! Splits the site by audience. The access guard wraps all of them; these
//! modules only decide which pages exist.

/// Marketing pages and the membership portal. Listed in `policy::PUBLIC_PATHS`.
pub mod public;

/// Signed-in member dashboard. Parts of it are KYC- or role-gated.
pub mod dashboard;

/// Admin and executive areas.
pub mod admin;

/// JSON API, OpenAPI document and Swagger UI. The guard always allows them.
pub mod api;

use crate::{AppState, handlers, models};
use axum::{Router, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// ApiDoc
///
/// OpenAPI document for the `/api` surface, served at `/api/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::check_access),
    components(schemas(
        models::AccessReport,
        models::Decision,
        models::Profile,
        crate::policy::Role,
    )),
    tags((name = "ngo-portal", description = "NGO portal access gateway"))
)]
pub struct ApiDoc;

/// API Router Module
///
/// Everything under `/api`. The guard lets these through untouched, so each
/// handler is responsible for its own checks.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health))
        .route("/api/access", get(handlers::check_access))
}

use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};

use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod guard;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod policy;

// Page and API routers, split by audience.
pub mod routes;
use routes::{admin, api, dashboard, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use identity::{HttpProfileService, MockProfileService, ProfileState};
pub use models::Decision;

/// AppState
///
/// Shared by every request. Cloning is cheap: one `Arc` and an immutable config.
/// The policy tables are statics and are not part of it.
#[derive(Clone)]
pub struct AppState {
    /// Identity service client used by the guard to resolve profiles.
    pub profiles: ProfileState,
    pub config: AppConfig,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(app_state: &AppState) -> ProfileState {
        app_state.profiles.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the site routers, puts the access guard in front of all of them and
/// adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Every matched route sits behind the guard. Unmatched paths go to the
    // fallback, the only place the static-asset bypass applies.
    let unmatched = Router::new()
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), guard::unmatched_guard))
        .with_state(state.clone());

    let base_router = Router::new()
        .merge(public::public_routes())
        .merge(dashboard::dashboard_routes())
        .merge(admin::admin_routes())
        .merge(api::api_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), guard::access_guard))
        .fallback_service(unmatched)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                // Innermost, so both guard layers can extract `Cookies`.
                .layer(CookieManagerLayer::new()),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the `http_request` span with method, uri and the generated request id,
/// so the guard's decision logs correlate with the request they belong to.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

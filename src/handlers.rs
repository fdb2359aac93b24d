use crate::{
    AppState,
    guard::{self, request_context},
    models::{AccessQuery, AccessReport},
    policy,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::Html,
};
use tower_cookies::Cookies;

// --- API Handlers ---

/// health
///
/// [API Route] Liveness probe for load balancers.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// check_access
///
/// [API Route] Reports the decision the guard would make if the caller opened
/// `path` with their current cookies. The frontend uses it to hide links the
/// caller cannot follow.
///
/// *Side effects*: none. Unlike the guard middleware, a failed lookup here does
/// NOT clear the session cookies; the report just says `RedirectToLogin`.
#[utoipa::path(
    get,
    path = "/api/access",
    params(AccessQuery),
    responses((status = 200, description = "Access decision", body = AccessReport))
)]
pub async fn check_access(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<AccessQuery>,
) -> Json<AccessReport> {
    let ctx = request_context(&query.path, &cookies);
    let decision = guard::evaluate(&ctx, state.profiles.as_ref()).await;

    Json(AccessReport {
        required_role: policy::required_role(&ctx.path),
        location: decision.location().map(str::to_string),
        decision,
        path: ctx.path,
    })
}

// --- Page Handlers ---

/// page
///
/// Placeholder renderer for every site page. Rendering is owned by the frontend;
/// this only proves the guard let the request through.
pub async fn page(uri: Uri) -> Html<String> {
    let path = policy::normalize_path(uri.path());
    Html(format!(
        "<!doctype html><html><head><title>{title}</title></head>\
         <body><main data-path=\"{path}\"><h1>{title}</h1></main></body></html>",
        title = page_title(&path),
        path = path,
    ))
}

/// not_found
///
/// Fallback for paths no router knows. Still runs behind the guard.
pub async fn not_found() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::NOT_FOUND,
        Html("<!doctype html><html><body><h1>Page not found</h1></body></html>"),
    )
}

/// `/dashboard/bank-accounts` -> `Bank Accounts`, `/` -> `Home`.
fn page_title(path: &str) -> String {
    let last = path.rsplit('/').find(|segment| !segment.is_empty());
    match last {
        None => "Home".to_string(),
        Some(segment) => segment
            .split('-')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

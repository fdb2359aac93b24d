use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    response::Response,
};
use ngo_portal::{
    AppConfig, AppState, create_router,
    identity::MockProfileService,
    models::Profile,
};
use std::sync::Arc;
use tower::ServiceExt;

// --- Helper Functions ---

fn app_with(mock: &MockProfileService) -> Router {
    create_router(AppState {
        profiles: Arc::new(mock.clone()),
        config: AppConfig::default(),
    })
}

async fn get(app: Router, path: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

fn removes(cookies: &[String], name: &str) -> bool {
    let prefix = format!("{}=;", name);
    cookies
        .iter()
        .any(|c| c.starts_with(&prefix) && c.contains("Max-Age=0"))
}

fn kyc_approved() -> Profile {
    Profile {
        kyc_status: Some("approved".to_string()),
        is_kyc_verified: true,
        ..Profile::default()
    }
}

// --- Tests ---

#[tokio::test]
async fn test_public_page_renders_without_lookup() {
    let mock = MockProfileService::failing();
    let response = get(app_with(&mock), "/about", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_portal() {
    let mock = MockProfileService::returning(kyc_approved());
    let response = get(app_with(&mock), "/dashboard/finance/budgets", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/membership/portal"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_rejected_token_redirects_and_clears_cookies() {
    let mock = MockProfileService::failing();
    let response = get(
        app_with(&mock),
        "/dashboard/finance/budgets",
        Some("accessToken=stale; userID=42"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/membership/portal"));

    let cookies = set_cookies(response.headers());
    assert!(removes(&cookies, "accessToken"), "got {:?}", cookies);
    assert!(removes(&cookies, "userID"), "got {:?}", cookies);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_empty_token_cookie_redirects_and_clears() {
    let mock = MockProfileService::returning(kyc_approved());
    let response = get(app_with(&mock), "/dashboard", Some("accessToken=; userID=42")).await;

    assert_eq!(location(&response), Some("/membership/portal"));
    assert!(removes(&set_cookies(response.headers()), "userID"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_portal_with_token_redirects_to_dashboard() {
    let mock = MockProfileService::failing();
    let response = get(app_with(&mock), "/membership/portal", Some("accessToken=abc")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/dashboard"));
    assert!(set_cookies(response.headers()).is_empty());
}

#[tokio::test]
async fn test_kyc_failure_keeps_session() {
    let mock = MockProfileService::returning(Profile::default());
    let response = get(app_with(&mock), "/donate", Some("accessToken=abc; userID=42")).await;

    assert_eq!(location(&response), Some("/dashboard/profile/update"));
    assert!(set_cookies(response.headers()).is_empty());
}

#[tokio::test]
async fn test_role_failure_keeps_session() {
    let mock = MockProfileService::returning(kyc_approved());
    let response = get(app_with(&mock), "/admin", Some("accessToken=abc; userID=42")).await;

    assert_eq!(location(&response), Some("/unauthorized"));
    assert!(set_cookies(response.headers()).is_empty());
}

#[tokio::test]
async fn test_authorized_page_is_served() {
    let mock = MockProfileService::returning(Profile {
        is_db_admin: true,
        ..kyc_approved()
    });
    let response = get(app_with(&mock), "/admin/members", Some("accessToken=abc")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mock.last_token().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_unknown_path_is_guarded() {
    let mock = MockProfileService::failing();
    let response = get(app_with(&mock), "/not-a-page", None).await;
    assert_eq!(location(&response), Some("/membership/portal"));

    // Signed in, the router's own 404 comes through.
    let mock = MockProfileService::returning(Profile::default());
    let response = get(app_with(&mock), "/not-a-page", Some("accessToken=abc")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_assets_skip_the_guard() {
    let mock = MockProfileService::failing();
    for path in ["/_next/static/chunks/app.js", "/favicon.ico", "/images/hero.webp"] {
        let response = get(app_with(&mock), path, Some("accessToken=stale")).await;
        // No such asset is served here, but the guard did not redirect.
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
        assert!(set_cookies(response.headers()).is_empty());
    }
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let mock = MockProfileService::failing();
    let response = get(app_with(&mock), "/about", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_asset_suffix_on_page_route_is_still_guarded() {
    let mock = MockProfileService::failing();
    for path in ["/admin/members.png", "/executive/report.svg"] {
        let response = get(app_with(&mock), path, None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(location(&response), Some("/membership/portal"), "{}", path);
    }

    // Signed in without the admin flag: still refused.
    let mock = MockProfileService::returning(kyc_approved());
    let response = get(app_with(&mock), "/admin/members.png", Some("accessToken=abc")).await;
    assert_eq!(location(&response), Some("/unauthorized"));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_asset_suffix_on_page_route_served_to_admin() {
    let mock = MockProfileService::returning(Profile {
        is_db_admin: true,
        ..kyc_approved()
    });
    let response = get(app_with(&mock), "/admin/members.png", Some("accessToken=abc")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

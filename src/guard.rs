use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    AppState,
    identity::ProfileService,
    models::{Decision, RequestContext},
    policy::{self, ADMIN_AREA_PREFIX, EXECUTIVE_AREA_PREFIX},
};

/// Cookie holding the bearer credential.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie holding the user id. Advisory only.
pub const USER_ID_COOKIE: &str = "userID";

/// evaluate
///
/// Decides what happens to one request. Rules are ordered and the first match wins:
///
/// 1. Auth entry page (login/registration) with a token present: send to the dashboard.
/// 2. Public page or API route: allow, without touching the identity service.
/// 3. Look up the profile. No token, transport error or non-2xx: back to login.
/// 4. KYC-protected page without approved KYC: send to profile update.
/// 5. Role-protected page (first matching table entry) without the role flag: unauthorized.
/// 6. Admin area without `is_DB_admin`, executive area without `is_DB_executive`: unauthorized.
///
/// Never fails. Every error path resolves to a redirect.
pub async fn evaluate(ctx: &RequestContext, profiles: &dyn ProfileService) -> Decision {
    let path = ctx.path.as_str();

    if policy::is_auth_entry(path) && ctx.has_token() {
        return Decision::RedirectToDashboard;
    }

    if policy::is_public(path) {
        return Decision::Allow;
    }

    // An empty token cannot authenticate; skip the round trip.
    if !ctx.has_token() {
        tracing::debug!(path, "no access token on guarded path");
        return Decision::RedirectToLogin;
    }

    let profile = match profiles.fetch_profile(&ctx.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(
                path,
                user_id = ctx.user_id.as_deref().unwrap_or("-"),
                timeout = e.is_timeout(),
                error = %e,
                "profile lookup failed, treating caller as signed out"
            );
            return Decision::RedirectToLogin;
        }
    };

    if policy::is_kyc_protected(path) && !profile.is_kyc_approved() {
        return Decision::RedirectToProfileUpdate;
    }

    if let Some(role) = policy::required_role(path) {
        if !role.granted_to(&profile) {
            tracing::debug!(path, role = role.name(), "missing role flag");
            return Decision::RedirectToUnauthorized;
        }
    }

    // Also covered by the role table today. Kept as an independent check.
    if policy::path_matches(path, ADMIN_AREA_PREFIX) && !profile.is_db_admin {
        return Decision::RedirectToUnauthorized;
    }
    if policy::path_matches(path, EXECUTIVE_AREA_PREFIX) && !profile.is_db_executive {
        return Decision::RedirectToUnauthorized;
    }

    Decision::Allow
}

/// Builds the request context from the request path and the identity cookies.
pub fn request_context(path: &str, cookies: &Cookies) -> RequestContext {
    let access_token = cookies
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();
    let user_id = cookies
        .get(USER_ID_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty());
    RequestContext::new(path, access_token, user_id)
}

/// Queues removal of both identity cookies on the outgoing response.
pub fn clear_session(cookies: &Cookies) {
    for name in [ACCESS_TOKEN_COOKIE, USER_ID_COOKIE] {
        cookies.remove(Cookie::build((name, "")).path("/").build());
    }
}

/// access_guard
///
/// Route layer on every page and API route. Whatever the path looks like, a
/// matched route is always evaluated; an asset-like suffix on a page path
/// (`/admin/members.png`) gets no special treatment here.
///
/// Requires `CookieManagerLayer` outside of it.
pub async fn access_guard(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, &cookies, request, next).await
}

/// unmatched_guard
///
/// Layer on the fallback only. Static assets (images, fonts, framework bundles)
/// pass straight through to the asset service; every other unknown path is
/// evaluated like a page, so anonymous callers get the login redirect rather
/// than a 404.
pub async fn unmatched_guard(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    if policy::is_static_asset(request.uri().path()) {
        return next.run(request).await;
    }
    enforce(&state, &cookies, request, next).await
}

/// Evaluates the request and either forwards it or answers with a
/// `307 Temporary Redirect`, purging the session when the lookup failed.
async fn enforce(state: &AppState, cookies: &Cookies, request: Request, next: Next) -> Response {
    let ctx = request_context(request.uri().path(), cookies);
    let decision = evaluate(&ctx, state.profiles.as_ref()).await;

    tracing::debug!(
        path = %ctx.path,
        user_id = ctx.user_id.as_deref().unwrap_or("-"),
        ?decision,
        "access decision"
    );

    if decision.clears_session() {
        clear_session(cookies);
    }

    match decision.location() {
        None => next.run(request).await,
        Some(target) => Redirect::temporary(target).into_response(),
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::Profile;

// --- Redirect Targets ---

/// Login / membership portal page.
pub const LOGIN_PATH: &str = "/membership/portal";
/// Where a caller with incomplete KYC is sent to finish verification.
pub const PROFILE_UPDATE_PATH: &str = "/dashboard/profile/update";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
/// Dashboard home.
pub const DASHBOARD_PATH: &str = "/dashboard";

// --- Policy Tables ---

/// Login and registration surfaces. A caller holding a token is bounced off these.
pub static AUTH_ENTRY_PATHS: &[&str] = &["/membership/portal", "/membership/register"];

/// Exempt from authentication entirely. Checked before any profile lookup.
pub static PUBLIC_PATHS: &[&str] = &[
    "/",
    "/about",
    "/history",
    "/leadership",
    "/membership",
    "/contact",
    "/unauthorized",
];

/// API routes carry their own authentication and are never guarded here.
pub const API_PREFIX: &str = "/api";

/// Require `is_kyc_verified` and `kyc_status == "approved"`.
pub static KYC_PROTECTED_PATHS: &[&str] = &[
    "/donate",
    "/dashboard/finance",
    "/dashboard/donations",
    "/dashboard/bank-accounts",
];

/// Role
///
/// A permission class, backed by one boolean flag on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Executive,
    Staff,
    Donor,
    Partner,
    Volunteer,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Executive => "executive",
            Role::Staff => "staff",
            Role::Donor => "donor",
            Role::Partner => "partner",
            Role::Volunteer => "volunteer",
        }
    }

    /// Whether `profile` carries this role's flag.
    pub fn granted_to(self, profile: &Profile) -> bool {
        match self {
            Role::Admin => profile.is_db_admin,
            Role::Executive => profile.is_db_executive,
            Role::Staff => profile.is_db_staff,
            Role::Donor => profile.is_donor,
            Role::Partner => profile.is_partner,
            Role::Volunteer => profile.is_volunteer,
        }
    }
}

/// Role-gated prefixes, scanned in declaration order. The FIRST entry with a
/// matching prefix decides the required role, so reordering changes outcomes.
pub static ROLE_PERMISSIONS: &[(Role, &[&str])] = &[
    (Role::Admin, &["/admin", "/dashboard/users", "/dashboard/settings"]),
    (
        Role::Executive,
        &["/executive", "/dashboard/finance", "/dashboard/bank-accounts"],
    ),
    (
        Role::Staff,
        &["/dashboard/projects", "/dashboard/tasks", "/dashboard/campaigns"],
    ),
    (Role::Donor, &["/dashboard/donations"]),
    (Role::Partner, &["/dashboard/partnerships"]),
    (Role::Volunteer, &["/dashboard/volunteering"]),
];

/// Checked after the role table regardless of what it said.
pub const ADMIN_AREA_PREFIX: &str = "/admin";
pub const EXECUTIVE_AREA_PREFIX: &str = "/executive";

// --- Matching ---

/// True if `path` equals `prefix` or continues it with a `/` segment boundary.
/// `/donate` matches `/donate` and `/donate/once`, never `/donate-history`.
/// The root entry `/` matches only the root itself.
pub fn path_matches(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

pub fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path_matches(path, prefix))
}

pub fn is_auth_entry(path: &str) -> bool {
    matches_any(path, AUTH_ENTRY_PATHS)
}

/// Public pages plus the whole API surface.
pub fn is_public(path: &str) -> bool {
    matches_any(path, PUBLIC_PATHS) || path_matches(path, API_PREFIX)
}

pub fn is_kyc_protected(path: &str) -> bool {
    matches_any(path, KYC_PROTECTED_PATHS)
}

/// First-match scan of `ROLE_PERMISSIONS`.
pub fn required_role(path: &str) -> Option<Role> {
    ROLE_PERMISSIONS
        .iter()
        .find(|(_, prefixes)| matches_any(path, prefixes))
        .map(|(role, _)| *role)
}

/// Canonical form used for every policy check: a leading `/`, no empty
/// segments, no trailing slash. `//admin/`, `admin` and `/admin` all become
/// `/admin`; an empty path becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

// --- Static Asset Exclusion ---

/// Framework asset prefix. Never guarded.
pub const FRAMEWORK_ASSET_PREFIX: &str = "/_next/";

static ASSET_EXTENSIONS: &[&str] = &[
    "ico", "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "woff", "woff2", "ttf", "otf",
    "eot",
];

/// Images, fonts, the favicon and framework bundles skip the guard entirely.
pub fn is_static_asset(path: &str) -> bool {
    if path.starts_with(FRAMEWORK_ASSET_PREFIX) || path == "/favicon.ico" {
        return true;
    }
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ASSET_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::policy::Role;

/// The only `kyc_status` value that counts as verified.
pub const KYC_APPROVED: &str = "approved";

// --- Identity Service Schemas ---

/// Profile
///
/// The caller's verification and role record, as returned by the identity service.
/// The gateway only reads it; every flag that is absent or `null` upstream is false.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[ts(export)]
pub struct Profile {
    #[serde(default)]
    pub kyc_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_kyc_verified: bool,

    // Role flags. The upstream field names are kept on the wire.
    #[serde(rename = "is_DB_admin", default, deserialize_with = "null_as_false")]
    pub is_db_admin: bool,
    #[serde(rename = "is_DB_executive", default, deserialize_with = "null_as_false")]
    pub is_db_executive: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_donor: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_partner: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_volunteer: bool,
    #[serde(rename = "is_DB_staff", default, deserialize_with = "null_as_false")]
    pub is_db_staff: bool,
}

impl Profile {
    /// KYC passes only when the flag is set AND the status reads `approved`.
    pub fn is_kyc_approved(&self) -> bool {
        self.is_kyc_verified && self.kyc_status.as_deref() == Some(KYC_APPROVED)
    }
}

/// ProfileEnvelope
///
/// Success body of the profile lookup. The profile sits under `profile_data`;
/// sibling fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileEnvelope {
    pub profile_data: Profile,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// --- Guard Schemas ---

/// RequestContext
///
/// Everything the guard knows about one inbound request. Built per request and
/// dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Normalized request path (see `policy::normalize_path`).
    pub path: String,
    /// Bearer credential from the `accessToken` cookie. Empty when missing.
    pub access_token: String,
    /// Value of the `userID` cookie. Logged, never trusted for authorization.
    pub user_id: Option<String>,
}

impl RequestContext {
    pub fn new(path: &str, access_token: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            path: crate::policy::normalize_path(path),
            access_token: access_token.into(),
            user_id,
        }
    }

    /// An anonymous request: no cookies at all.
    pub fn anonymous(path: &str) -> Self {
        Self::new(path, String::new(), None)
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// Decision
///
/// Outcome of evaluating one request. Every failure mode is a redirect; the guard
/// never surfaces an error page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub enum Decision {
    Allow,
    /// Credential missing or rejected. The response also clears both identity cookies.
    RedirectToLogin,
    /// Signed-in caller hit a login or registration page.
    RedirectToDashboard,
    /// KYC-protected page, KYC not approved.
    RedirectToProfileUpdate,
    /// Role-protected page, role flag missing.
    RedirectToUnauthorized,
}

impl Decision {
    /// Redirect target, or `None` for `Allow`.
    pub fn location(self) -> Option<&'static str> {
        use crate::policy::{DASHBOARD_PATH, LOGIN_PATH, PROFILE_UPDATE_PATH, UNAUTHORIZED_PATH};
        match self {
            Decision::Allow => None,
            Decision::RedirectToLogin => Some(LOGIN_PATH),
            Decision::RedirectToDashboard => Some(DASHBOARD_PATH),
            Decision::RedirectToProfileUpdate => Some(PROFILE_UPDATE_PATH),
            Decision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }

    /// Only a failed identity lookup purges the session. KYC and role failures
    /// leave it intact.
    pub fn clears_session(self) -> bool {
        matches!(self, Decision::RedirectToLogin)
    }
}

// --- API Schemas ---

/// AccessQuery
///
/// Query parameters for `GET /api/access`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccessQuery {
    /// Page path to evaluate, e.g. `/dashboard/finance/budgets`.
    pub path: String,
}

/// AccessReport
///
/// What the guard would do if the caller navigated to `path` right now.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct AccessReport {
    pub path: String,
    pub decision: Decision,
    pub location: Option<String>,
    /// Role the path is gated on, if any, by the first matching permission entry.
    pub required_role: Option<Role>,
}

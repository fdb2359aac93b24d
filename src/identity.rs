use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Profile, ProfileEnvelope};

/// Fixed lookup path on the identity service, appended to the configured base URL.
pub const PROFILE_LOOKUP_PATH: &str = "/accounts/profile/";

/// ProfileError
///
/// Every way a profile lookup can fail. The guard does not distinguish between
/// them (all of them mean "not signed in"), but the variants keep the logs useful.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Connection refused, DNS failure, timeout, or any other transport problem.
    #[error("identity service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    /// The identity service answered, but not with a 2xx.
    #[error("identity service rejected the credential with status {0}")]
    Rejected(StatusCode),
    /// A 2xx whose body was not a `{ "profile_data": ... }` object.
    #[error("identity service returned an unreadable profile: {0}")]
    Malformed(#[source] reqwest::Error),
    /// Canned failure from `MockProfileService`.
    #[error("simulated identity failure")]
    Simulated,
}

impl ProfileError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProfileError::Transport(e) if e.is_timeout())
    }
}

// 1. ProfileService Contract
/// ProfileService
///
/// Resolves a bearer token to the caller's profile. The guard talks to this trait
/// only, so tests can swap the HTTP client for `MockProfileService`.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// One attempt, no retries. Any error means the caller is not authenticated.
    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, ProfileError>;
}

/// ProfileState
///
/// The shared handle stored in the application state.
pub type ProfileState = Arc<dyn ProfileService>;

// 2. The Real Implementation (HTTP)
/// HttpProfileService
///
/// Calls `GET <base_url>/accounts/profile/` on the identity service. The inner
/// `reqwest::Client` is reused across requests and carries the lookup timeout.
#[derive(Clone)]
pub struct HttpProfileService {
    client: reqwest::Client,
    profile_url: String,
}

impl HttpProfileService {
    /// new
    ///
    /// Builds the client. Fails only if the TLS backend cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            profile_url: format!("{}{}", base_url.trim_end_matches('/'), PROFILE_LOOKUP_PATH),
        })
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }
}

#[async_trait]
impl ProfileService for HttpProfileService {
    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, ProfileError> {
        let response = self
            .client
            .get(&self.profile_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ProfileError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::Rejected(status));
        }

        let envelope = response
            .json::<ProfileEnvelope>()
            .await
            .map_err(ProfileError::Malformed)?;

        Ok(envelope.profile_data)
    }
}

// 3. The Mock Implementation (For Tests)
/// MockProfileService
///
/// Returns a canned profile, or fails on every call. Counts calls and remembers
/// the last token so tests can assert whether (and how) a lookup happened.
#[derive(Clone, Default)]
pub struct MockProfileService {
    /// `None` simulates an identity failure.
    pub profile: Option<Profile>,
    calls: Arc<AtomicUsize>,
    last_token: Arc<Mutex<Option<String>>>,
}

impl MockProfileService {
    pub fn returning(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of `fetch_profile` calls so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ProfileService for MockProfileService {
    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.last_token.lock() {
            *slot = Some(access_token.to_string());
        }
        self.profile.clone().ok_or(ProfileError::Simulated)
    }
}

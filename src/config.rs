use std::{env, time::Duration};

/// Lookup timeout used when `PROFILE_FETCH_TIMEOUT_MS` is unset or unparsable.
pub const DEFAULT_PROFILE_TIMEOUT: Duration = Duration::from_millis(5000);

/// AppConfig
///
/// Holds the gateway's configuration. Loaded once at startup and cloned into the
/// application state; nothing mutates it afterwards.
///
/// The access policy itself is not part of this struct. It lives in `policy`
/// as static tables, so changing who can open which page is a code change.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the identity service that owns user profiles.
    pub identity_base_url: String,
    // Upper bound on a single profile lookup. Expiry counts as a failed login.
    pub profile_timeout: Duration,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Selects the log format and fail-fast rules.
    pub env: Env,
}

/// Env
///
/// Runtime context. Production demands every external endpoint be set explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking config for test state setup.
    fn default() -> Self {
        Self {
            identity_base_url: "http://localhost:8000".to_string(),
            profile_timeout: DEFAULT_PROFILE_TIMEOUT,
            bind_addr: "0.0.0.0:3000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics if `IDENTITY_SERVICE_URL` is missing while `APP_ENV=production`. A
    /// gateway pointed at the wrong identity service would lock everybody out
    /// (or worse), so it refuses to start instead.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let identity_base_url = match env {
            Env::Production => env::var("IDENTITY_SERVICE_URL")
                .expect("FATAL: IDENTITY_SERVICE_URL must be set in production."),
            Env::Local => env::var("IDENTITY_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
        };

        let profile_timeout = env::var("PROFILE_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROFILE_TIMEOUT);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            // Joined with the lookup path later; a trailing slash would double up.
            identity_base_url: identity_base_url.trim_end_matches('/').to_string(),
            profile_timeout,
            bind_addr,
            env,
        }
    }
}

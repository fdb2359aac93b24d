use ngo_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    identity::{HttpProfileService, ProfileState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, builds the identity client and serves
/// the guarded router.
#[tokio::main]
async fn main() {
    // 1. Configuration. Fails fast on missing production settings.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging. RUST_LOG wins; otherwise debug for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ngo_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Identity service client, bounded by the configured lookup timeout.
    let profiles = HttpProfileService::new(&config.identity_base_url, config.profile_timeout)
        .expect("FATAL: Failed to build the identity service HTTP client.");
    tracing::info!(
        profile_url = profiles.profile_url(),
        timeout_ms = config.profile_timeout.as_millis() as u64,
        "identity service configured"
    );
    let profiles = Arc::new(profiles) as ProfileState;

    // 4. Router and server.
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { profiles, config });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: Failed to bind {}: {}", bind_addr, e));

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API documentation available at http://{}/api/docs", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
    }
}

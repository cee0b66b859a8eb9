//! Application bootstrapper
//!
//! Reads configuration once and hands plain values to every service.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, CONFIG};
use crate::db;
use crate::endpoints;
use crate::services::{
    scheduler, InviteSettings, JwtKeys, NotificationService, PasswordHasher, SystemClock,
};
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    init_tracing(&CONFIG);

    tracing::info!("Starting employee-invites v{}", CONFIG.version);

    let state = init_services(&CONFIG).await?;

    scheduler::start_scheduler(
        state.invites.clone(),
        Duration::from_secs(CONFIG.invites.expiry_sweep_secs),
    );

    let app = create_app(state, &CONFIG.server.allowed_origins);

    serve(app, &CONFIG).await
}

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("employee_invites={},tower_http=info", config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init();
    }
}

/// Connect the database and wire every service
async fn init_services(config: &Config) -> anyhow::Result<AppState> {
    let conn = db::connect(&config.database).await?;
    tracing::info!("Database connection established");

    let jwt = JwtKeys::from_secret_or_random(
        config.auth.jwt_secret.as_deref(),
        config.auth.access_token_ttl_secs,
    );
    let hasher = PasswordHasher::new(config.auth.password_hash_cost);
    let notification = NotificationService::from_config(&config.email)?;
    let settings = InviteSettings {
        storefront_url: config.invites.storefront_url.clone(),
        ttl_days: config.invites.ttl_days,
    };

    let state = AppState::new(
        conn,
        jwt,
        hasher,
        notification,
        Arc::new(SystemClock),
        settings,
    );

    if let Some(admin) = &config.auth.bootstrap_admin {
        state
            .accounts
            .ensure_admin_user(&admin.email, &admin.password, "Platform", "Admin")
            .await?;
    } else {
        tracing::info!("No bootstrap admin configured");
    }

    Ok(state)
}

/// Create the main application router
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
async fn serve(app: Router, config: &Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

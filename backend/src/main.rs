//! Gym Manager Backend
//!
//! A backend-as-a-service gym-management API over a managed document store
//! and an external identity provider.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: validation-then-persist pipelines, the user-provisioning
//!   workflow, and the member listing queries
//! - Gateways: document-store and identity-provider clients

use anyhow::Result;
use gym_manager_backend::identity::{IdentityProvider, MemoryIdentity, RestIdentity};
use gym_manager_backend::store::{DocumentStore, FirestoreStore, MemoryStore};
use gym_manager_backend::{config, gcp, routes, state::AppState};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Gym Manager Backend"
    );

    // Build the gateway handles once; handlers only see the traits.
    let (store, identity) = build_gateways(&config)?;

    // Create application state
    let state = AppState::new(config.clone(), store, identity);

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve credentials and construct the store/identity gateways.
///
/// With a service-account key (configured path or ambient
/// `GOOGLE_APPLICATION_CREDENTIALS`) the remote clients are used and the
/// key's project id is authoritative. Without one, development falls back
/// to the in-memory gateways; production refuses to start.
fn build_gateways(
    config: &config::AppConfig,
) -> Result<(Arc<dyn DocumentStore>, Arc<dyn IdentityProvider>)> {
    match gcp::ServiceAccountKey::discover(config.firebase.credentials_file.as_deref()) {
        Some(key) => {
            let project_id = key.project_id.clone();
            info!(project_id = %project_id, "Using service-account credentials");
            let tokens = gcp::TokenProvider::new(Some(key));
            let store = FirestoreStore::new(
                &config.firebase.firestore_url,
                &project_id,
                tokens.clone(),
            );
            let identity =
                RestIdentity::new(&config.firebase.identity_url, &project_id, tokens);
            Ok((Arc::new(store), Arc::new(identity)))
        }
        None => {
            if config::AppConfig::is_production() {
                anyhow::bail!("no service-account credentials found in production");
            }
            warn!(
                "No service-account credentials found. \
                 Falling back to in-memory gateways (data is not persisted)."
            );
            Ok((Arc::new(MemoryStore::new()), Arc::new(MemoryIdentity::new())))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "gym_manager_backend=info,tower_http=info".into()
        } else {
            "gym_manager_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

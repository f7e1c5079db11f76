use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_api::background;
use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_classifier::GeminiClassifier;
use campus_core::Classify;
use campus_db::{IssueRepository, IssueStore, MongoStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Document store ---
    // The client connects lazily; the server must boot into degraded mode
    // when the store is down, so only the connection string is fatal here.
    let store: Arc<dyn IssueStore> = Arc::new(
        MongoStore::connect(&config.mongo_url, &config.db_name)
            .await
            .expect("Invalid MONGO_URL"),
    );

    if store.health_check().await {
        tracing::info!("Document store reachable");
    } else {
        tracing::warn!("Document store unreachable at startup, serving degraded");
    }

    // --- Classifier ---
    let classifier: Arc<dyn Classify> =
        Arc::new(GeminiClassifier::new(config.google_api_key.clone()));
    if config.google_api_key.is_some() {
        tracing::info!("AI classification enabled");
    } else {
        tracing::info!("No GOOGLE_API_KEY set, issues get default classification");
    }

    // --- Repository / app state ---
    let repo = IssueRepository::new(Arc::clone(&store), Some(Arc::clone(&classifier)));
    let state = AppState {
        repo,
        store: Arc::clone(&store),
        classifier,
        config: Arc::new(config.clone()),
    };

    // --- Escalation loop ---
    let escalation_cancel = CancellationToken::new();
    let escalation_handle = tokio::spawn(background::escalation::run(
        Arc::clone(&store),
        config.escalation.clone(),
        escalation_cancel.clone(),
    ));
    tracing::info!("Escalation loop spawned");

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    escalation_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), escalation_handle).await;
    tracing::info!("Escalation loop stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

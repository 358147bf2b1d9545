use std::net::SocketAddr;
use std::sync::Arc;

use gemeinde_api::bootstrap::ensure_bootstrap_admin;
use gemeinde_api::config::ServerConfig;
use gemeinde_api::router::build_app_router;
use gemeinde_api::state::AppState;
use gemeinde_storage::{S3BlobStore, StorageConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // `LOG_FORMAT=json` switches to one JSON object per line for log shipping.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gemeinde_api=debug,gemeinde_storage=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = gemeinde_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    gemeinde_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    gemeinde_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        match ensure_bootstrap_admin(&pool, admin).await {
            Ok(true) => tracing::info!(username = %admin.username, "Bootstrap super admin created"),
            Ok(false) => tracing::debug!("Users exist, skipping bootstrap admin"),
            Err(e) => panic!("Failed to create bootstrap admin: {e}"),
        }
    }

    // --- Object storage ---
    let storage_config = StorageConfig::from_env().expect("Invalid object storage configuration");
    let blobs = S3BlobStore::connect(&storage_config)
        .await
        .expect("Failed to configure object storage");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blobs: Arc::new(blobs),
    };

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

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
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

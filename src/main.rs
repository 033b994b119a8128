//! Elev8 API server

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elev8_api::{
    api::{self, AppState},
    config::Config,
    db,
};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elev8_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Elev8 API...");

    let config_path = std::env::var("ELEV8_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yml"));
    let config = Config::load_with_env(&config_path)?;
    tracing::info!("Configuration loaded from {}", config_path.display());

    // The service runs without a datastore; only /test and /contact need it
    let pool = if config.database.is_configured() {
        let pool = db::create_pool(&config.database).await?;
        tokio::spawn(prepare_datastore(pool.clone()));
        Some(pool)
    } else {
        tracing::warn!("No database URL configured, contact submissions will fail");
        None
    };

    let state = AppState::new(pool.clone(), &config.contact);
    let app = api::build_router(state, &config.server)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Ping and migrate the datastore, retrying until it becomes reachable.
///
/// Runs beside the server: routes that do not touch the datastore keep
/// answering, and `/test` reports the failure while it lasts.
async fn prepare_datastore(pool: db::DynDatabasePool) {
    let mut delay = Duration::from_secs(1);
    loop {
        let attempt = async {
            pool.ping().await?;
            db::migrations::run_migrations(&pool).await
        };
        match attempt.await {
            Ok(_) => {
                tracing::info!("Database ready: {:?}", pool.driver());
                return;
            }
            Err(e) => {
                tracing::warn!("Database unavailable, retrying in {:?}: {:#}", delay, e);
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! ayur-server: Ayurvedic patient records and diet plan API.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ayur_server::config::Config;
use ayur_server::db::{self, PatientRepository};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env();

    let repo = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .expect("Failed to create database pool");
            PatientRepository::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, patients are kept in memory only");
            PatientRepository::in_memory()
        }
    };
    repo.migrate().await.expect("Failed to create database schema");

    if config.openai_api_key.is_some() {
        tracing::info!("OpenAI API key configured, live diet plan generation enabled");
    } else {
        tracing::warn!("OPENAI_API_KEY not set, only showcase patients can get diet plans");
    }
    tracing::info!(
        environment = config.environment.as_str(),
        rate_limit_rps = config.rate_limit_rps,
        store = repo.backend(),
        "Configuration loaded"
    );

    let app = ayur_server::build_app(repo, &config);

    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting Ayurvedic diet server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

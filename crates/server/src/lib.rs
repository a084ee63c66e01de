//! ayur-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
mod middleware;
mod routes;
mod state;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::{CompletionConfig, DietPlanGenerator, GeneratorConfig, LlmClient};
use config::Config;
use db::PatientRepository;
use state::{AppState, IntakeSessions};

/// Build the diet plan generator from configuration.
/// Without an API key only fixture patients can be served.
pub fn build_generator(config: &Config) -> DietPlanGenerator {
    let client = config.openai_api_key.as_ref().map(|key| match &config.openai_base_url {
        Some(base) => LlmClient::with_base_url(key.clone(), base.clone()),
        None => LlmClient::new(key.clone()),
    });

    DietPlanGenerator::new(
        client,
        GeneratorConfig {
            completion: CompletionConfig::default(),
            fixture_delay: config.fixture_delay,
        },
    )
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(repo: PatientRepository, config: &Config) -> Router {
    let state = AppState {
        repo,
        generator: Arc::new(build_generator(config)),
        intake: IntakeSessions::default(),
        environment: config.environment,
    };

    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    let api_routes = routes::api_routes()
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic; the second install is
    // silently ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    let public_routes = Router::new()
        .route("/", get(routes::root::welcome))
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::health::metrics))
        .layer(Extension(prometheus_handle));

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mut app = Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .fallback(routes::root::not_found)
        .with_state(state);

    if config.environment.is_production() {
        app = app.layer(axum_mw::from_fn(middleware::redact_middleware));
    }

    app.layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}

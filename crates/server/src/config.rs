//! Server configuration

use std::time::Duration;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub bind_address: String,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub openai_api_key: Option<String>,
    /// Override for OpenAI-compatible gateways
    pub openai_base_url: Option<String>,
    /// Simulated latency for showcase fixture plans
    pub fixture_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_address: "0.0.0.0:5000".to_string(),
            environment: Environment::Development,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            rate_limit_rps: 100,
            openai_api_key: None,
            openai_base_url: None,
            fixture_delay: Duration::from_secs(3),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "5000".into());
            format!("0.0.0.0:{port}")
        });

        let environment = match std::env::var("APP_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .as_deref()
        {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let fixture_delay = std::env::var("FIXTURE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.fixture_delay);

        Self {
            database_url: non_empty_var("DATABASE_URL"),
            bind_address,
            environment,
            cors_origins,
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_rps),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_base_url: non_empty_var("OPENAI_BASE_URL"),
            fixture_delay,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

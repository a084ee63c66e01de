//! HTTP middleware

pub mod audit;
pub mod metrics;
pub mod rate_limit;
pub mod redact;
pub mod request_id;

pub use audit::audit_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::{create_rate_limiter, rate_limit_middleware};
pub use redact::redact_middleware;
pub use request_id::request_id_middleware;

//! Sample HTTP service with Prometheus request instrumentation.
//!
//! Every request is timed and counted by method, route and status code:
//!
//! ```text
//! http_request_duration_seconds{method="GET",route="/health",status_code="200"}  histogram
//! http_requests_total{method="GET",route="/health",status_code="200"}            counter
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`metrics`]: Prometheus recorder and request metrics
//! - [`api`]: HTTP routes, handlers and instrumentation middleware
//! - [`server`]: Listener binding and graceful serving
//! - [`utils`]: Timestamps, host name, shutdown signal

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};

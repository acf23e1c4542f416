//! HTTP API module: root, health and metrics endpoints plus instrumentation.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

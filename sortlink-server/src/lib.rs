//! Demo HTTP service for sortlink.
//!
//! Serves a fixed set of records as JSON, ordered per the `sort`/`dir`
//! query parameters, together with the sort links for every column.

pub mod errors;
pub mod handlers;
pub mod secrets;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use errors::{AppError, AppResult};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_secrets))
        .route("/secrets", get(handlers::list_secrets))
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

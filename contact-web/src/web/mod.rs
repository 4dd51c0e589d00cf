//! Web server module for the contact endpoint.
//!
//! Routes:
//! - `POST /api/contact` accepts a contact form submission
//! - `GET /health` liveness probe

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, submit_contact, AppState, ContactAccepted, HealthResponse, OkResponse};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/contact", post(submit_contact))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{
    AppState, booking_stats, cancel_booking, complete_booking, confirm_booking, create_booking,
    get_booking, list_bookings, update_booking,
};

/// Creates the API router with all booking endpoints
///
/// Every booking endpoint requires the `X-Business-Id` header.
/// Requests running longer than `request_timeout` are aborted with 408;
/// an in-flight slot reservation or release still runs to completion.
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/stats", get(booking_stats))
        .route("/bookings/:id", get(get_booking).patch(update_booking))
        .route("/bookings/:id/confirm", post(confirm_booking))
        .route("/bookings/:id/cancel", post(cancel_booking))
        .route("/bookings/:id/complete", post(complete_booking))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

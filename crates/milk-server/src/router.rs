use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all batch endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route(
            "/batches",
            post(handler::create_batch).get(handler::list_batches),
        )
        .route("/batches/:id", get(handler::read_batch))
        .route("/batches/:id/history", get(handler::batch_history))
        .route("/batches/:id/transport", post(handler::add_transport))
        .route("/batches/:id/lab-results", post(handler::add_lab_result))
        .route("/batches/:id/approve", post(handler::approve_batch))
        .route("/batches/:id/process", post(handler::process_batch))
        .route("/batches/:id/ship", post(handler::ship_batch))
        .route("/batches/:id/receive", post(handler::receive_batch))
        .route("/public/batches/:id", get(handler::public_view))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

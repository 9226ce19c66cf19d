use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::violations::handlers::{self, ViolationState};
use crate::features::violations::services::ViolationService;

/// Create routes for the violations feature
///
/// All routes require the auth middleware to be applied by the caller.
/// Listing, lookup and adjudication additionally require the admin role.
pub fn routes(violation_service: Arc<ViolationService>) -> Router {
    let state = ViolationState { violation_service };

    Router::new()
        .route(
            "/api/violation",
            post(handlers::create_violation).get(handlers::list_violations),
        )
        .route("/api/violation/pending", get(handlers::list_pending_violations))
        .route("/api/violation/me", get(handlers::list_my_violations))
        .route("/api/violation/{id}", get(handlers::get_violation))
        .route(
            "/api/violation/{id}/process",
            post(handlers::process_violation),
        )
        .with_state(state)
}

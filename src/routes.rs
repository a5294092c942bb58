// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// Assembles the main application router.
///
/// * One `/exec` endpoint takes both GET and POST; the `action` query
///   parameter picks the operation.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (the workbook behind its request-wide lock).
pub fn create_router(state: AppState) -> Router {
    // Students open the form from a shared link, so any origin may call
    // in. Legacy clients post with a text/plain content type to dodge the
    // CORS preflight; the dispatcher reads the raw body either way.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/exec", get(handlers::dispatch).post(handlers::dispatch))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

use axum::{Router, http::Method, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        books::list_books_handler,
        status::{health_handler, ping_handler},
    },
    infra::app_state::AppState,
};

/// Assemble the application router.
pub fn create_router(state: AppState) -> Router {
    // Read-only public API: GET from anywhere is fine.
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/books", get(list_books_handler))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        // Middleware layers in order (outer to inner):
        // 1. CORS (outermost)
        .layer(cors_layer)
        // 2. Tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

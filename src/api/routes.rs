//! API Routes
//!
//! Configures the Axum router with all feed service endpoints.

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{
    feed_json_handler, feed_page_handler, health_handler, layout_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Feed page
/// - `GET /api/feed` - Feed layout as JSON
/// - `GET /api/layout` - Layout of placeholder items
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
/// - `/css/*`, `/js/*` - Static assets
///
/// # Middleware
/// - Panic recovery: A panicking handler answers 500
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let css = ServeDir::new(state.static_dir.join("css"));
    let js = ServeDir::new(state.static_dir.join("js"));

    let router = Router::new()
        .route("/", get(feed_page_handler))
        .route("/api/feed", get(feed_json_handler))
        .route("/api/layout", get(layout_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .nest_service("/css", css)
        .nest_service("/js", js);

    with_middleware(router).with_state(state)
}

/// Wraps `router` in the middleware stack shared by every route.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

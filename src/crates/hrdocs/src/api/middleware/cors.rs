//! CORS middleware configuration

use tower_http::cors::CorsLayer;

/// Browser clients are served from other origins during development
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::analysis::handlers::handle_analyze;
use crate::documents::handlers::handle_generate_docx;
use crate::errors::AppError;
use crate::state::AppState;

/// Headroom above `MAX_FILE_SIZE` for the text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/generate-docx", post(handle_generate_docx))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// `*` allows any origin; otherwise a comma-separated origin list.
pub fn cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {o:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

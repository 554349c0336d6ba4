pub mod config;
pub mod error;
pub mod extraction;
pub mod ocr;
pub mod pdf;
pub mod routes;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use config::Config;
use extraction::TextExtractor;
use storage::local::LocalStorageBackend;

/// Shared state handed to every request handler.
///
/// Holds no per-request data: each upload is owned by the handler that
/// received it.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<LocalStorageBackend>,
    pub pdf_extractor: Arc<dyn TextExtractor>,
    pub ocr_extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Build state with the real PDF and Tesseract backends.
    pub fn from_config(config: Config) -> Self {
        let storage = Arc::new(LocalStorageBackend::new(config.upload_path.clone()));
        let pdf_extractor: Arc<dyn TextExtractor> = Arc::new(pdf::PdfExtractor::new());
        let ocr_extractor: Arc<dyn TextExtractor> = Arc::new(ocr::OcrService::new_with_config(
            ocr::OcrConfig {
                language: config.ocr_language.clone(),
            },
        ));

        Self {
            config,
            storage,
            pdf_extractor,
            ocr_extractor,
        }
    }
}

/// Assemble the application router: API routes, static assets, and middleware.
pub fn create_app(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_file_size_bytes();
    let cors_enabled = state.config.cors_enabled;
    let public_dir = ServeDir::new(&state.config.public_dir);

    let mut app = Router::new()
        .merge(routes::extract::router())
        .nest("/api", routes::health::router())
        .fallback_service(public_dir)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}

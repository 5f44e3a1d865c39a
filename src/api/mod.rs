pub mod handlers;

pub use handlers::*;

use crate::service::AnalyzerService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 构建路由
pub fn router(service: Arc<AnalyzerService>, max_upload_bytes: usize) -> Router {
    let analyze_routes = Router::new()
        .route("/analyze", post(analyze_form))
        .route("/api/analyze", post(analyze_json))
        .with_state(service);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .merge(analyze_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

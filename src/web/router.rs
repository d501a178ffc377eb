//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers::{
    create_folder, delete_file, empty_trash, list_files, toggle_star, toggle_trash, upload_file,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let file_routes = Router::new()
        .route("/files", get(list_files))
        .route("/files/:id", delete(delete_file))
        .route("/files/:id/star", patch(toggle_star))
        .route("/files/:id/trash", patch(toggle_trash))
        .route("/folders", post(create_folder))
        .route("/upload", post(upload_file))
        .route("/trash", delete(empty_trash));

    let api_routes = Router::new()
        .merge(file_routes)
        .route("/openapi.json", get(openapi_json));

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

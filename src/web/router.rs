//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    delete_email, get_email, inbox, login, mark_read, register, send_email, sent, snoozed,
    update_profile, AppState,
};
use super::middleware::create_cors_layer;
use super::openapi::ApiDoc;
use super::ws::events_ws_handler;
use crate::config::WebConfig;
use crate::file::UPLOADS_URL_PREFIX;

/// Room for multipart framing and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let body_limit = app_state.storage.max_bytes() + FORM_OVERHEAD_BYTES;

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/update/:id", put(update_profile));

    let email_routes = Router::new()
        .route("/send", post(send_email))
        .route("/inbox/:email", get(inbox))
        .route("/sent/:email", get(sent))
        .route("/snoozed/:email", get(snoozed))
        .route("/read/:id", put(mark_read))
        .route("/:id", get(get_email).delete(delete_email));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/emails", email_routes);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(events_ws_handler))
        .merge(create_health_router())
        .merge(create_swagger_router());

    if web_config.serve_uploads {
        router = router.merge(create_uploads_router(app_state.storage.base_path()));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Serve stored uploads under `/uploads`.
pub fn create_uploads_router<S>(upload_dir: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().nest_service(UPLOADS_URL_PREFIX, ServeDir::new(upload_dir))
}

/// Create the Swagger UI router.
pub fn create_swagger_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

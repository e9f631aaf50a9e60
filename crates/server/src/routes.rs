use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use service::users::UserService;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::handle_panic;
use crate::metrics;
use crate::openapi::ApiDoc;

pub mod users;

/// Shared handler state; the store lives inside the service.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService>,
}

impl ServerState {
    pub fn new(users: UserService) -> Self {
        Self { users: Arc::new(users) }
    }

    /// State over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(UserService::in_memory())
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/users",
            get(users::list_or_get)
                .post(users::create)
                .patch(users::update)
                .delete(users::delete),
        )
        .route("/users/toggle", post(users::toggle))
}

/// Build the full application router: user routes under both `/users` and
/// `/api/users`, health, metrics, OpenAPI docs and the static client page.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let index = format!("{}/index.html", frontend_dir.trim_end_matches('/'));
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler));

    let api = Router::new()
        .merge(user_routes())
        .nest("/api", user_routes())
        .with_state(state);

    public
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_dir)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx is logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::student::{repository::StudentRepository, service::StudentService};

pub mod students;

/// Shared handler state: the student service over whichever repository
/// backend startup selected.
#[derive(Clone)]
pub struct ServerState {
    pub students: Arc<StudentService<dyn StudentRepository>>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: static frontend, health, student API,
/// Swagger UI.
pub fn build_router(cors: CorsLayer, frontend_dir: &str, state: ServerState) -> Router {
    let static_dir = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    // Public routes (static + health)
    let public = Router::new()
        .nest_service("/", static_dir)
        .route("/health", get(health));

    // Student API (paths match the original dashboard client)
    let api = Router::new()
        .route("/api/students/save", post(students::save))
        .route("/api/students/delete/:id", delete(students::delete))
        .route("/api/students/all", get(students::find_all))
        .route("/api/students/count", get(students::count))
        .route("/api/students/byYear", get(students::by_year))
        .route("/api/students/:id", get(students::get));

    public
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

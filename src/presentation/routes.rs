//! Route definitions and server setup

use axum::{Router, middleware, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::Config;
use crate::presentation::controllers::{self, AppState};
use crate::presentation::middleware::logging_middleware;
use crate::presentation::models::{ErrorBody, HealthResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::run_audit,
        crate::presentation::controllers::health
    ),
    components(schemas(ErrorBody, HealthResponse)),
    tags(
        (name = "audit", description = "Page audit execution endpoints"),
        (name = "health", description = "System health monitoring endpoints")
    ),
    info(
        title = "Pharos API",
        version = "0.1.0",
        description = "Runs a page quality audit in a dedicated headless browser session and returns the report projected down to the requested audits and categories.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// Create the application router. The audit endpoint answers GET, POST and
/// OPTIONS through the same handler so preflight short-circuits inside the
/// pipeline.
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .route("/health", get(controllers::health))
        .route(
            "/audit",
            get(controllers::run_audit)
                .post(controllers::run_audit)
                .options(controllers::run_audit),
        );

    // Conditionally expose the OpenAPI document (avoid leaking docs in production).
    if config.server.enable_docs {
        router = router.route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        );
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware)),
        )
        .with_state(app_state)
}

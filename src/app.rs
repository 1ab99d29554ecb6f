use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full router: public and protected project routes plus `/` and `/health`
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Anonymous, published-only reads
        .merge(public_project_routes())
        // Staff reads and mutations behind JWT auth
        .merge(protected_project_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config)),
        )
        .with_state(state)
}

fn public_project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/public/projects",
            get(public::get).head(public::head).options(public::options),
        )
        .route(
            "/api/public/projects/:projId",
            get(public::get).head(public::head).options(public::options),
        )
}

fn protected_project_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/projects",
            get(protected::get)
                .head(protected::head)
                .post(protected::post)
                .options(protected::options),
        )
        .route(
            "/api/projects/:projId",
            get(protected::get)
                .head(protected::head)
                .put(protected::put)
                .delete(protected::delete)
                .options(protected::options),
        )
        .route(
            "/api/projects/:projId/publish",
            put(protected::publish).options(protected::options),
        )
        .route(
            "/api/projects/:projId/unpublish",
            put(protected::unpublish).options(protected::options),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Project API (Rust)",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": "/api/public/projects[/:projId] (GET, HEAD, OPTIONS)",
            "protected": "/api/projects[/:projId] (GET, HEAD, POST, PUT, DELETE, OPTIONS; JWT with sysadmin or staff)",
            "publish": "/api/projects/:projId/publish, /api/projects/:projId/unpublish (PUT; JWT)",
            "health": "/health"
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.projects.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

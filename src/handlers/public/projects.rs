use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::handlers::utils::read;
use crate::middleware::{ApiResponse, Endpoint, PUBLIC_RESOURCE};
use crate::services::ProjectQuery;
use crate::state::AppState;
use crate::types::PUBLIC_ROLES;

const HEAD: Endpoint = Endpoint::new("HEAD", "Public/Projects", PUBLIC_RESOURCE);
const GET: Endpoint = Endpoint::new("GET", "Public/Projects", PUBLIC_RESOURCE);

/// OPTIONS /api/public/projects[/:projId] - empty 200
pub async fn options() -> impl IntoResponse {
    ApiResponse::<()>::empty()
}

/// HEAD /api/public/projects[/:projId] - GET without a body
pub async fn head(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Response {
    read(HEAD, state, PUBLIC_ROLES, path, query).await
}

/// GET /api/public/projects[/:projId] - one published project or a page of them
pub async fn get(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Response {
    read(GET, state, PUBLIC_ROLES, path, query).await
}

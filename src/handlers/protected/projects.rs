use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Extension,
};

use crate::handlers::utils::read;
use crate::middleware::{guard, ApiResponse, AuthUser, Endpoint, PROTECTED_RESOURCE};
use crate::services::params::parse_project_body;
use crate::services::{ProjectParams, ProjectQuery};
use crate::state::AppState;
use crate::types::SECURE_ROLES;

const HEAD: Endpoint = Endpoint::new("HEAD", "Projects", PROTECTED_RESOURCE);
const GET: Endpoint = Endpoint::new("GET", "Projects", PROTECTED_RESOURCE);
const POST: Endpoint = Endpoint::new("POST", "Projects", PROTECTED_RESOURCE);
const PUT: Endpoint = Endpoint::new("PUT", "Projects", PROTECTED_RESOURCE);
const DELETE: Endpoint = Endpoint::new("DELETE", "Projects", PROTECTED_RESOURCE);
const PUBLISH: Endpoint = Endpoint::new("PUT", "Projects/Publish", PROTECTED_RESOURCE);
const UNPUBLISH: Endpoint = Endpoint::new("PUT", "Projects/Unpublish", PROTECTED_RESOURCE);

/// OPTIONS /api/projects[/:projId[/publish|/unpublish]] - empty 200
pub async fn options() -> impl IntoResponse {
    ApiResponse::<()>::empty()
}

/// HEAD /api/projects[/:projId]
pub async fn head(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Response {
    read(HEAD, state, SECURE_ROLES, path, query).await
}

/// GET /api/projects[/:projId] - drafts included, audit fields visible
pub async fn get(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Response {
    read(GET, state, SECURE_ROLES, path, query).await
}

/// POST /api/projects - body is the new project
pub async fn post(State(state): State<AppState>, Extension(user): Extension<AuthUser>, body: Bytes) -> Response {
    guard(POST, async move {
        let params = ProjectParams::default().with_project(parse_project_body(&body)?);
        let project = state.projects.create(&user.username, params).await?;
        Ok(ApiResponse::success(project))
    })
    .await
}

/// PUT /api/projects/:projId - body holds the fields to change
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(proj_id): Path<String>,
    body: Bytes,
) -> Response {
    guard(PUT, async move {
        let params = ProjectParams::with_id(proj_id).with_project(parse_project_body(&body)?);
        let project = state.projects.update(&user.username, params).await?;
        Ok(ApiResponse::success(project))
    })
    .await
}

/// DELETE /api/projects/:projId - answers with the deleted record
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(proj_id): Path<String>,
) -> Response {
    guard(DELETE, async move {
        let project = state.projects.delete(&user.username, ProjectParams::with_id(proj_id)).await?;
        Ok(ApiResponse::success(project))
    })
    .await
}

/// PUT /api/projects/:projId/publish
pub async fn publish(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(proj_id): Path<String>,
) -> Response {
    guard(PUBLISH, async move {
        let project = state.projects.publish(&user.username, ProjectParams::with_id(proj_id)).await?;
        Ok(ApiResponse::success(project))
    })
    .await
}

/// PUT /api/projects/:projId/unpublish
pub async fn unpublish(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(proj_id): Path<String>,
) -> Response {
    guard(UNPUBLISH, async move {
        let project = state.projects.unpublish(&user.username, ProjectParams::with_id(proj_id)).await?;
        Ok(ApiResponse::success(project))
    })
    .await
}

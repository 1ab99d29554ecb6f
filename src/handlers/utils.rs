use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    response::Response,
};

use crate::error::ApiError;
use crate::middleware::{guard, ApiResponse, Endpoint};
use crate::services::{ProjectParams, ProjectQuery};
use crate::state::AppState;
use crate::types::RoleSet;

/// Combine the optional `:projId` path segment with the query string
pub fn params_from(
    path: Option<Path<String>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Result<ProjectParams, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::invalid_request(e.body_text()))?;
    Ok(ProjectParams::from_request(path.map(|Path(id)| id), query))
}

/// Shared body of every GET and HEAD handler
pub async fn read(
    endpoint: Endpoint,
    state: AppState,
    roles: RoleSet,
    path: Option<Path<String>>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Response {
    guard(endpoint, async move {
        let params = params_from(path, query)?;
        let data = state.projects.get(roles, params).await?;
        Ok(ApiResponse::success(data))
    })
    .await
}

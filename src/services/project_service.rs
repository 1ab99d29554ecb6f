use std::sync::Arc;

use serde::Serialize;

use crate::database::models::{Project, ProjectPage};
use crate::database::{DatabaseError, ProjectGateway};
use crate::error::ApiError;
use crate::services::params::ProjectParams;
use crate::types::{RoleSet, SECURE_ROLES};

/// Body of a successful read: one project or a page of them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectData {
    One(Project),
    Page(ProjectPage),
}

/// Orchestrates project operations over a gateway.
///
/// Every mutating operation first loads the record with `SECURE_ROLES` and
/// stops with `ProjectNotFound` when it is absent. The check and the mutation
/// are separate gateway calls, so a concurrent delete between them surfaces
/// as a gateway error.
#[derive(Clone)]
pub struct ProjectService {
    gateway: Arc<dyn ProjectGateway>,
    max_page_size: i64,
}

impl ProjectService {
    pub fn new(gateway: Arc<dyn ProjectGateway>, max_page_size: i64) -> Self {
        Self { gateway, max_page_size }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.gateway.health_check().await
    }

    /// Single project when `projId` is given, otherwise a page
    pub async fn get(&self, roles: RoleSet, params: ProjectParams) -> Result<ProjectData, ApiError> {
        match params.proj_id.as_deref() {
            Some(id) => {
                tracing::debug!("Fetching project {}", id);
                self.gateway
                    .get_project(roles, id)
                    .await?
                    .map(ProjectData::One)
                    .ok_or(ApiError::InformationNotFound)
            }
            None => {
                let page = params.paging.to_page_request(self.max_page_size)?;
                tracing::debug!(
                    page_number = page.page_number,
                    page_size = page.page_size,
                    "Fetching project page"
                );
                Ok(ProjectData::Page(self.gateway.get_projects(roles, &page).await?))
            }
        }
    }

    /// Create, then return the record as staff would read it
    pub async fn create(&self, username: &str, mut params: ProjectParams) -> Result<Project, ApiError> {
        let payload = params.require_project()?;
        tracing::debug!("Creating new project");

        let created = self
            .gateway
            .create_project(username, payload)
            .await?
            .ok_or(ApiError::CreateFailed)?;
        let id = created.id().ok_or(ApiError::CreateFailed)?;

        self.gateway
            .get_project(SECURE_ROLES, id)
            .await?
            .ok_or(ApiError::CreateFailed)
    }

    pub async fn update(&self, username: &str, mut params: ProjectParams) -> Result<Project, ApiError> {
        let payload = params.require_project()?;
        let id = params.require_id()?;
        tracing::debug!("Updating project {}", id);

        let existing = self.existing(id).await?;
        Ok(self.gateway.update_project(username, &existing, payload).await?)
    }

    /// Returns the record as it was before deletion, so a client can retry
    /// safely or recreate it.
    pub async fn delete(&self, username: &str, params: ProjectParams) -> Result<Project, ApiError> {
        let id = params.require_id()?;
        tracing::debug!("Deleting project {}", id);

        let existing = self.existing(id).await?;
        self.gateway.delete_project(username, &existing).await?;
        Ok(existing)
    }

    pub async fn publish(&self, username: &str, params: ProjectParams) -> Result<Project, ApiError> {
        let id = params.require_id()?;
        tracing::debug!("Publishing project {}", id);

        let existing = self.existing(id).await?;
        Ok(self.gateway.publish_project(username, &existing).await?)
    }

    pub async fn unpublish(&self, username: &str, params: ProjectParams) -> Result<Project, ApiError> {
        let id = params.require_id()?;
        tracing::debug!("Un-publishing project {}", id);

        let existing = self.existing(id).await?;
        Ok(self.gateway.unpublish_project(username, &existing).await?)
    }

    async fn existing(&self, id: &str) -> Result<Project, ApiError> {
        self.gateway
            .get_project(SECURE_ROLES, id)
            .await?
            .ok_or_else(|| ApiError::project_not_found(id))
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::gateway::{payload_name, PageRequest, ProjectGateway};
use crate::database::manager::DatabaseError;
use crate::database::models::project::strip_system_fields;
use crate::database::models::{Project, ProjectPage, ProjectPayload};
use crate::filter::Filter;
use crate::types::RoleSet;

/// Project store held in process memory.
///
/// Used when no database is configured and as the backing store for tests.
/// Applies the same visibility and uniqueness rules as the Postgres gateway.
#[derive(Clone, Default)]
pub struct MemoryProjectGateway {
    projects: Arc<RwLock<HashMap<String, Project>>>,
}

impl MemoryProjectGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with complete records (system fields included)
    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let map = projects
            .into_iter()
            .filter_map(|p| p.id().map(|id| (id.to_string(), p.clone())))
            .collect();
        Self {
            projects: Arc::new(RwLock::new(map)),
        }
    }

    fn now() -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    fn visible(roles: RoleSet, project: &Project) -> Option<Project> {
        if roles.is_elevated() {
            Some(project.clone())
        } else if project.is_published() {
            Some(project.redacted())
        } else {
            None
        }
    }

    fn name_taken(projects: &HashMap<String, Project>, name: &str, except: Option<&str>) -> bool {
        projects.values().any(|p| {
            p.id() != except
                && p.name().map(|n| n.trim().eq_ignore_ascii_case(name.trim())).unwrap_or(false)
        })
    }

    fn existing_id(existing: &Project) -> Result<&str, DatabaseError> {
        existing
            .id()
            .ok_or_else(|| DatabaseError::InvalidPayload("project has no identifier".to_string()))
    }

    /// Apply `change` to the stored copy of `existing` and return the result
    async fn modify<F>(&self, username: &str, existing: &Project, change: F) -> Result<Project, DatabaseError>
    where
        F: FnOnce(&mut serde_json::Map<String, Value>, &HashMap<String, Project>) -> Result<(), DatabaseError>,
    {
        let id = Self::existing_id(existing)?;
        let mut projects = self.projects.write().await;
        let mut record = projects
            .get(id)
            .cloned()
            .ok_or_else(|| DatabaseError::RecordMissing(id.to_string()))?
            .into_map();

        change(&mut record, &*projects)?;
        record.insert("updatedBy".to_string(), Value::String(username.to_string()));
        record.insert("updatedAt".to_string(), Self::now());

        let project = Project::from_map(record);
        projects.insert(id.to_string(), project.clone());
        Ok(project)
    }
}

#[async_trait]
impl ProjectGateway for MemoryProjectGateway {
    async fn get_project(&self, roles: RoleSet, id: &str) -> Result<Option<Project>, DatabaseError> {
        let projects = self.projects.read().await;
        Ok(projects.get(id).and_then(|p| Self::visible(roles, p)))
    }

    async fn get_projects(&self, roles: RoleSet, page: &PageRequest) -> Result<ProjectPage, DatabaseError> {
        let projects = self.projects.read().await;
        let (items, total) = Filter::new(roles, page).apply(projects.values());
        let data = items
            .iter()
            .filter_map(|p| Self::visible(roles, p))
            .collect();

        Ok(ProjectPage {
            data,
            total,
            page_number: page.page_number,
            page_size: page.page_size,
        })
    }

    async fn create_project(&self, username: &str, payload: ProjectPayload) -> Result<Option<Project>, DatabaseError> {
        let mut record = strip_system_fields(&payload);
        let name = payload_name(&record)?
            .ok_or_else(|| DatabaseError::InvalidPayload("project name is required".to_string()))?;
        record.insert("name".to_string(), Value::String(name.clone()));

        let mut projects = self.projects.write().await;
        if Self::name_taken(&projects, &name, None) {
            tracing::warn!("Refusing to create duplicate project '{}'", name);
            return Ok(None);
        }

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        record.insert("_id".to_string(), Value::String(id.clone()));
        record.insert("published".to_string(), Value::Bool(false));
        record.insert("publishedAt".to_string(), Value::Null);
        record.insert("createdBy".to_string(), Value::String(username.to_string()));
        record.insert("updatedBy".to_string(), Value::String(username.to_string()));
        record.insert("createdAt".to_string(), now.clone());
        record.insert("updatedAt".to_string(), now);

        let project = Project::from_map(record);
        projects.insert(id, project.clone());
        Ok(Some(project))
    }

    async fn update_project(
        &self,
        username: &str,
        existing: &Project,
        payload: ProjectPayload,
    ) -> Result<Project, DatabaseError> {
        let mut changes = strip_system_fields(&payload);
        let name = payload_name(&changes)?;
        if let Some(name) = &name {
            changes.insert("name".to_string(), Value::String(name.clone()));
        }

        self.modify(username, existing, |record, projects| {
            if let Some(name) = &name {
                let id = record.get("_id").and_then(Value::as_str);
                if Self::name_taken(projects, name, id) {
                    return Err(DatabaseError::InvalidPayload(format!("project name '{}' is already in use", name)));
                }
            }
            record.extend(changes);
            Ok(())
        })
        .await
    }

    async fn delete_project(&self, _username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        let id = Self::existing_id(existing)?;
        self.projects
            .write()
            .await
            .remove(id)
            .ok_or_else(|| DatabaseError::RecordMissing(id.to_string()))
    }

    async fn publish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        self.modify(username, existing, |record, _| {
            record.insert("published".to_string(), Value::Bool(true));
            record.insert("publishedAt".to_string(), Self::now());
            Ok(())
        })
        .await
    }

    async fn unpublish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        self.modify(username, existing, |record, _| {
            record.insert("published".to_string(), Value::Bool(false));
            record.insert("publishedAt".to_string(), Value::Null);
            Ok(())
        })
        .await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

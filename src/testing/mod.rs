use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::database::models::{Project, ProjectPage, ProjectPayload};
use crate::database::{DatabaseError, MemoryProjectGateway, PageRequest, ProjectGateway};
use crate::types::RoleSet;

/// Complete stored record for seeding a gateway
pub fn project_fixture(id: &str, name: &str, published: bool) -> Project {
    serde_json::from_value(json!({
        "_id": id,
        "name": name,
        "description": format!("{} description", name),
        "published": published,
        "publishedAt": if published { json!("2024-01-01T00:00:00.000Z") } else { json!(null) },
        "createdBy": "seed",
        "updatedBy": "seed",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    }))
    .expect("fixture is a JSON object")
}

/// Memory gateway that records every call and can be told to fail one
#[derive(Clone)]
pub struct RecordingGateway {
    inner: MemoryProjectGateway,
    calls: Arc<Mutex<Vec<&'static str>>>,
    roles: Arc<Mutex<Vec<Vec<&'static str>>>>,
    fail_on: Option<&'static str>,
    tag_returns: bool,
}

impl RecordingGateway {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            inner: MemoryProjectGateway::with_projects(projects),
            calls: Arc::new(Mutex::new(Vec::new())),
            roles: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            tag_returns: false,
        }
    }

    pub fn failing_on(mut self, call: &'static str) -> Self {
        self.fail_on = Some(call);
        self
    }

    /// Add `"returnedBy": "<call>"` to what `create_project` and
    /// `delete_project` hand back, without touching the stored record
    pub fn tagging_returns(mut self) -> Self {
        self.tag_returns = true;
        self
    }

    pub fn inner(&self) -> &MemoryProjectGateway {
        &self.inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Role names passed to each read call, in order
    pub fn roles_seen(&self) -> Vec<Vec<&'static str>> {
        self.roles.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), DatabaseError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(call) {
            return Err(DatabaseError::UnexpectedRow(format!("injected failure in {}", call)));
        }
        Ok(())
    }

    fn tag(&self, call: &'static str, project: Project) -> Project {
        if !self.tag_returns {
            return project;
        }
        let mut map = project.into_map();
        map.insert("returnedBy".to_string(), json!(call));
        Project::from_map(map)
    }

    fn record_roles(&self, roles: RoleSet) {
        self.roles.lock().unwrap().push(roles.names());
    }
}

#[async_trait]
impl ProjectGateway for RecordingGateway {
    async fn get_project(&self, roles: RoleSet, id: &str) -> Result<Option<Project>, DatabaseError> {
        self.record_roles(roles);
        self.record("get_project")?;
        self.inner.get_project(roles, id).await
    }

    async fn get_projects(&self, roles: RoleSet, page: &PageRequest) -> Result<ProjectPage, DatabaseError> {
        self.record_roles(roles);
        self.record("get_projects")?;
        self.inner.get_projects(roles, page).await
    }

    async fn create_project(&self, username: &str, payload: ProjectPayload) -> Result<Option<Project>, DatabaseError> {
        self.record("create_project")?;
        let created = self.inner.create_project(username, payload).await?;
        Ok(created.map(|p| self.tag("create_project", p)))
    }

    async fn update_project(
        &self,
        username: &str,
        existing: &Project,
        payload: ProjectPayload,
    ) -> Result<Project, DatabaseError> {
        self.record("update_project")?;
        self.inner.update_project(username, existing, payload).await
    }

    async fn delete_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        self.record("delete_project")?;
        let removed = self.inner.delete_project(username, existing).await?;
        Ok(self.tag("delete_project", removed))
    }

    async fn publish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        self.record("publish_project")?;
        self.inner.publish_project(username, existing).await
    }

    async fn unpublish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        self.record("unpublish_project")?;
        self.inner.unpublish_project(username, existing).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.record("health_check")?;
        self.inner.health_check().await
    }
}

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Project, ProjectPage, ProjectPayload};
use crate::types::RoleSet;

/// Listing arguments after defaults have been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
    pub sort_by: String,
    pub keywords: String,
    pub query: String,
}

/// Trimmed `name` carried by a payload, or `None` when it has none.
/// A blank or non-string name is an error.
pub fn payload_name(payload: &ProjectPayload) -> Result<Option<String>, DatabaseError> {
    match payload.get("name") {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| Some(n.to_string()))
            .ok_or_else(|| DatabaseError::InvalidPayload("project name must be a non-empty string".to_string())),
    }
}

/// Persistence boundary for project records.
///
/// Implementations own visibility rules (driven by the role set), field
/// redaction, uniqueness and the publish flag. Callers only thread values
/// through.
#[async_trait]
pub trait ProjectGateway: Send + Sync {
    /// Fetch a single project visible to `roles`
    async fn get_project(&self, roles: RoleSet, id: &str) -> Result<Option<Project>, DatabaseError>;

    /// Fetch one page of projects visible to `roles`
    async fn get_projects(&self, roles: RoleSet, page: &PageRequest) -> Result<ProjectPage, DatabaseError>;

    /// Insert a project. `None` when the store refused the record.
    async fn create_project(&self, username: &str, payload: ProjectPayload) -> Result<Option<Project>, DatabaseError>;

    async fn update_project(
        &self,
        username: &str,
        existing: &Project,
        payload: ProjectPayload,
    ) -> Result<Project, DatabaseError>;

    async fn delete_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError>;

    async fn publish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError>;

    async fn unpublish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn payload(value: Value) -> ProjectPayload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn payload_name_is_trimmed() {
        assert_eq!(payload_name(&payload(json!({"name": "  Alpha "}))).unwrap(), Some("Alpha".to_string()));
        assert_eq!(payload_name(&payload(json!({"region": "north"}))).unwrap(), None);
    }

    #[test]
    fn blank_or_non_string_names_are_invalid() {
        assert!(matches!(payload_name(&payload(json!({"name": "   "}))), Err(DatabaseError::InvalidPayload(_))));
        assert!(matches!(payload_name(&payload(json!({"name": 7}))), Err(DatabaseError::InvalidPayload(_))));
    }
}

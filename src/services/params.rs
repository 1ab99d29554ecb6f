use serde::Deserialize;
use serde_json::Value;

use crate::database::models::ProjectPayload;
use crate::database::PageRequest;
use crate::error::ApiError;

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Query string accepted by the read routes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    pub proj_id: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub query: Option<String>,
    pub keywords: Option<String>,
}

/// Listing parameters as supplied. Defaults are applied by `to_page_request`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingParams {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub query: Option<String>,
    pub keywords: Option<String>,
}

impl PagingParams {
    /// Zero or absent numbers fall back to page 1 of 10; `page_size` is
    /// capped at `max_page_size`.
    pub fn to_page_request(&self, max_page_size: i64) -> Result<PageRequest, ApiError> {
        let page_number = match self.page_number {
            None | Some(0) => DEFAULT_PAGE_NUMBER,
            Some(n) if n < 0 => return Err(ApiError::invalid_request("'pageNumber' must be positive")),
            Some(n) => n,
        };
        let page_size = match self.page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(n) if n < 0 => return Err(ApiError::invalid_request("'pageSize' must be positive")),
            Some(n) => n.min(max_page_size.max(1)),
        };

        Ok(PageRequest {
            page_number,
            page_size,
            sort_by: self.sort_by.clone().unwrap_or_default(),
            keywords: self.keywords.clone().unwrap_or_default(),
            query: self.query.clone().unwrap_or_default(),
        })
    }
}

/// Named parameters of a single project request
#[derive(Debug, Clone, Default)]
pub struct ProjectParams {
    pub proj_id: Option<String>,
    pub paging: PagingParams,
    pub project: Option<ProjectPayload>,
}

impl ProjectParams {
    /// Build from a path id (takes precedence) and the query string
    pub fn from_request(path_id: Option<String>, query: ProjectQuery) -> Self {
        let proj_id = path_id
            .or(query.proj_id)
            .filter(|id| !id.trim().is_empty());

        Self {
            proj_id,
            paging: PagingParams {
                page_number: query.page_number,
                page_size: query.page_size,
                sort_by: query.sort_by,
                query: query.query,
                keywords: query.keywords,
            },
            project: None,
        }
    }

    pub fn with_id(proj_id: impl Into<String>) -> Self {
        Self::from_request(Some(proj_id.into()), ProjectQuery::default())
    }

    pub fn with_project(mut self, project: Option<ProjectPayload>) -> Self {
        self.project = project;
        self
    }

    pub fn require_id(&self) -> Result<&str, ApiError> {
        self.proj_id
            .as_deref()
            .ok_or_else(|| ApiError::invalid_request("missing 'projId'"))
    }

    pub fn require_project(&mut self) -> Result<ProjectPayload, ApiError> {
        self.project
            .take()
            .ok_or_else(|| ApiError::invalid_request("missing 'project'"))
    }
}

/// Interpret a request body as the `project` parameter.
///
/// An empty body means the parameter is absent. Anything other than a JSON
/// object is rejected.
pub fn parse_project_body(body: &[u8]) -> Result<Option<ProjectPayload>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(Value::Null) => Ok(None),
        Ok(_) => Err(ApiError::invalid_request("'project' must be a JSON object")),
        Err(e) => Err(ApiError::invalid_request(format!("'project' is not valid JSON: {}", e))),
    }
}

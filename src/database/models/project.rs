use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload accepted from clients on create and update
pub type ProjectPayload = Map<String, Value>;

/// Fields owned by the persistence layer. Clients cannot set them.
pub const SYSTEM_FIELDS: &[&str] = &[
    "_id",
    "published",
    "publishedAt",
    "createdBy",
    "updatedBy",
    "createdAt",
    "updatedAt",
];

/// Fields hidden from callers without an elevated role
pub const AUDIT_FIELDS: &[&str] = &["createdBy", "updatedBy"];

/// A project record as returned by the gateway.
///
/// The HTTP layer treats it as an opaque JSON object; only `_id` is read,
/// to re-fetch a freshly created record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Project(Map<String, Value>);

impl Project {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("_id").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn is_published(&self) -> bool {
        self.0.get("published").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Copy with audit fields removed
    pub fn redacted(&self) -> Self {
        let mut map = self.0.clone();
        for field in AUDIT_FIELDS {
            map.remove(*field);
        }
        Self(map)
    }
}

/// Drop every system field from a client payload
pub fn strip_system_fields(payload: &ProjectPayload) -> ProjectPayload {
    payload
        .iter()
        .filter(|(key, _)| !SYSTEM_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// One page of a project listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub data: Vec<Project>,
    pub total: i64,
    pub page_number: i64,
    pub page_size: i64,
}

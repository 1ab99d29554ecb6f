use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Project fields a listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(SortField::Name),
            "createdAt" | "dateAdded" => Some(SortField::CreatedAt),
            "updatedAt" | "dateUpdated" => Some(SortField::UpdatedAt),
            "publishedAt" => Some(SortField::PublishedAt),
            _ => None,
        }
    }

    /// Key in the record as returned by the gateway
    pub fn record_key(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::PublishedAt => "publishedAt",
        }
    }

    /// ORDER BY expression over the `projects` table. Names sort
    /// case-insensitively, matching the in-memory ordering.
    pub fn order_expr(&self) -> &'static str {
        match self {
            SortField::Name => "lower(\"name\")",
            SortField::CreatedAt => "\"created_at\"",
            SortField::UpdatedAt => "\"updated_at\"",
            SortField::PublishedAt => "\"published_at\"",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub field: SortField,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

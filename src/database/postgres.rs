use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row};
use uuid::Uuid;

use crate::database::gateway::{payload_name, PageRequest, ProjectGateway};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::project::strip_system_fields;
use crate::database::models::{Project, ProjectPage, ProjectPayload};
use crate::filter::Filter;
use crate::types::RoleSet;

/// Columns folded back into the client-facing record shape
const RECORD_SELECT: &str = r#""data" || jsonb_build_object(
    '_id', "id",
    'name', "name",
    'published', "published",
    'publishedAt', "published_at",
    'createdBy', "created_by",
    'updatedBy', "updated_by",
    'createdAt', "created_at",
    'updatedAt', "updated_at"
) AS "row""#;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "projects" (
        "id"           TEXT PRIMARY KEY,
        "name"         TEXT NOT NULL,
        "data"         JSONB NOT NULL DEFAULT '{}'::jsonb,
        "published"    BOOLEAN NOT NULL DEFAULT FALSE,
        "created_by"   TEXT,
        "updated_by"   TEXT,
        "created_at"   TIMESTAMPTZ NOT NULL DEFAULT now(),
        "updated_at"   TIMESTAMPTZ NOT NULL DEFAULT now(),
        "published_at" TIMESTAMPTZ
    )
"#;

const CREATE_NAME_INDEX: &str =
    r#"CREATE UNIQUE INDEX IF NOT EXISTS "projects_name_key" ON "projects" (lower("name"))"#;

/// Project gateway backed by the `projects` table
#[derive(Clone)]
pub struct PgProjectGateway {
    db: DatabaseManager,
    log_queries: bool,
}

impl PgProjectGateway {
    pub fn new(db: DatabaseManager, log_queries: bool) -> Self {
        Self { db, log_queries }
    }

    fn pool(&self) -> &PgPool {
        self.db.pool()
    }

    /// Create the table and its indexes when missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABLE).execute(self.pool()).await?;
        sqlx::query(CREATE_NAME_INDEX).execute(self.pool()).await?;
        tracing::info!("Project schema ready");
        Ok(())
    }

    fn log(&self, sql: &str) {
        if self.log_queries {
            tracing::debug!(sql = %sql, "project query");
        }
    }

    fn row_to_project(row: &sqlx::postgres::PgRow) -> Result<Project, DatabaseError> {
        match row.try_get::<Value, _>("row")? {
            Value::Object(map) => Ok(Project::from_map(map)),
            other => Err(DatabaseError::UnexpectedRow(other.to_string())),
        }
    }

    fn existing_id(existing: &Project) -> Result<&str, DatabaseError> {
        existing
            .id()
            .ok_or_else(|| DatabaseError::InvalidPayload("project has no identifier".to_string()))
    }

    /// Run a single-row mutation returning the record, or `RecordMissing`
    async fn mutate(&self, sql: &str, id: &str, username: &str) -> Result<Project, DatabaseError> {
        self.log(sql);
        let row = sqlx::query(sql)
            .bind(id)
            .bind(username)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::RecordMissing(id.to_string()))?;
        Self::row_to_project(&row)
    }
}

#[async_trait]
impl ProjectGateway for PgProjectGateway {
    async fn get_project(&self, roles: RoleSet, id: &str) -> Result<Option<Project>, DatabaseError> {
        let visibility = if roles.is_elevated() { "" } else { " AND \"published\" = TRUE" };
        let sql = format!("SELECT {RECORD_SELECT} FROM \"projects\" WHERE \"id\" = $1{visibility}");
        self.log(&sql);

        let row = sqlx::query(&sql).bind(id).fetch_optional(self.pool()).await?;
        let project = row.as_ref().map(Self::row_to_project).transpose()?;

        Ok(if roles.is_elevated() {
            project
        } else {
            project.map(|p| p.redacted())
        })
    }

    async fn get_projects(&self, roles: RoleSet, page: &PageRequest) -> Result<ProjectPage, DatabaseError> {
        let filter = Filter::new(roles, page);

        let select = filter.to_sql(RECORD_SELECT);
        self.log(&select.query);
        let mut q = sqlx::query(&select.query);
        for p in select.params.iter() {
            q = bind_param_query(q, p);
        }
        let rows = q.fetch_all(self.pool()).await?;

        let count = filter.to_count_sql();
        self.log(&count.query);
        let mut q = sqlx::query(&count.query);
        for p in count.params.iter() {
            q = bind_param_query(q, p);
        }
        let total: i64 = q.fetch_one(self.pool()).await?.try_get("count")?;

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            let project = Self::row_to_project(row)?;
            data.push(if roles.is_elevated() { project } else { project.redacted() });
        }

        Ok(ProjectPage {
            data,
            total,
            page_number: page.page_number,
            page_size: page.page_size,
        })
    }

    async fn create_project(&self, username: &str, payload: ProjectPayload) -> Result<Option<Project>, DatabaseError> {
        let mut data = strip_system_fields(&payload);
        let name = payload_name(&data)?
            .ok_or_else(|| DatabaseError::InvalidPayload("project name is required".to_string()))?;
        data.insert("name".to_string(), Value::String(name.clone()));

        // Duplicate names hit the unique index and insert nothing
        let sql = format!(
            "INSERT INTO \"projects\" (\"id\", \"name\", \"data\", \"created_by\", \"updated_by\") \
             VALUES ($1, $2, $3, $4, $4) ON CONFLICT DO NOTHING RETURNING {RECORD_SELECT}"
        );
        self.log(&sql);

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&name)
            .bind(Value::Object(data))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_project(&row)?)),
            None => {
                tracing::warn!("Refusing to create duplicate project '{}'", name);
                Ok(None)
            }
        }
    }

    async fn update_project(
        &self,
        username: &str,
        existing: &Project,
        payload: ProjectPayload,
    ) -> Result<Project, DatabaseError> {
        let id = Self::existing_id(existing)?;
        let mut changes = strip_system_fields(&payload);
        let name = payload_name(&changes)?;
        if let Some(name) = &name {
            changes.insert("name".to_string(), Value::String(name.clone()));
        }

        let sql = format!(
            "UPDATE \"projects\" SET \"data\" = \"data\" || $2, \"name\" = COALESCE($3, \"name\"), \
             \"updated_by\" = $4, \"updated_at\" = now() WHERE \"id\" = $1 RETURNING {RECORD_SELECT}"
        );
        self.log(&sql);

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(changes))
            .bind(name)
            .bind(username)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::RecordMissing(id.to_string()))?;
        Self::row_to_project(&row)
    }

    async fn delete_project(&self, _username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        let id = Self::existing_id(existing)?;
        let sql = format!("DELETE FROM \"projects\" WHERE \"id\" = $1 RETURNING {RECORD_SELECT}");
        self.log(&sql);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::RecordMissing(id.to_string()))?;
        Self::row_to_project(&row)
    }

    async fn publish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        let sql = format!(
            "UPDATE \"projects\" SET \"published\" = TRUE, \"published_at\" = now(), \
             \"updated_by\" = $2, \"updated_at\" = now() WHERE \"id\" = $1 RETURNING {RECORD_SELECT}"
        );
        self.mutate(&sql, Self::existing_id(existing)?, username).await
    }

    async fn unpublish_project(&self, username: &str, existing: &Project) -> Result<Project, DatabaseError> {
        let sql = format!(
            "UPDATE \"projects\" SET \"published\" = FALSE, \"published_at\" = NULL, \
             \"updated_by\" = $2, \"updated_at\" = now() WHERE \"id\" = $1 RETURNING {RECORD_SELECT}"
        );
        self.mutate(&sql, Self::existing_id(existing)?, username).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use project_api::app::app;
use project_api::auth::{generate_jwt, Claims};
use project_api::config::AppConfig;
use project_api::database::models::{Project, ProjectPage, ProjectPayload};
use project_api::database::{DatabaseError, MemoryProjectGateway, PageRequest, ProjectGateway};
use project_api::state::AppState;
use project_api::types::{Role, RoleSet};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
}

impl TestServer {
    /// Serve `gateway` in-process on a free port
    pub async fn spawn(gateway: Arc<dyn ProjectGateway>) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let config = AppConfig::development();

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let router = app(AppState::new(gateway, config.clone()));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("test server stopped: {}", e);
            }
        });

        let server = Self { port, base_url, config };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    /// Serve a memory store seeded with `projects`
    pub async fn with_projects(projects: Vec<Project>) -> Result<Self> {
        Self::spawn(Arc::new(MemoryProjectGateway::with_projects(projects))).await
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if client.get(self.url("/health")).send().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bearer token signed with this server's secret
    pub fn token(&self, username: &str, roles: &[Role]) -> String {
        let claims = Claims::new(username, roles, 1);
        generate_jwt(&claims, &self.config.security.jwt_secret).expect("sign test token")
    }

    pub fn staff_token(&self) -> String {
        self.token("alice", &[Role::Staff])
    }
}

/// Complete stored record for seeding a store
pub fn project(id: &str, name: &str, published: bool) -> Project {
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

/// How a `FaultyGateway` misbehaves on every call
#[derive(Clone, Copy)]
pub enum Fault {
    Error,
    Panic,
}

/// Store whose every operation fails
pub struct FaultyGateway(pub Fault);

impl FaultyGateway {
    fn fail<T>(&self, call: &str) -> Result<T, DatabaseError> {
        match self.0 {
            Fault::Error => Err(DatabaseError::UnexpectedRow(format!("connection reset during {}", call))),
            Fault::Panic => panic!("store exploded during {}", call),
        }
    }
}

#[async_trait]
impl ProjectGateway for FaultyGateway {
    async fn get_project(&self, _roles: RoleSet, _id: &str) -> Result<Option<Project>, DatabaseError> {
        self.fail("get_project")
    }

    async fn get_projects(&self, _roles: RoleSet, _page: &PageRequest) -> Result<ProjectPage, DatabaseError> {
        self.fail("get_projects")
    }

    async fn create_project(&self, _username: &str, _payload: ProjectPayload) -> Result<Option<Project>, DatabaseError> {
        self.fail("create_project")
    }

    async fn update_project(
        &self,
        _username: &str,
        _existing: &Project,
        _payload: ProjectPayload,
    ) -> Result<Project, DatabaseError> {
        self.fail("update_project")
    }

    async fn delete_project(&self, _username: &str, _existing: &Project) -> Result<Project, DatabaseError> {
        self.fail("delete_project")
    }

    async fn publish_project(&self, _username: &str, _existing: &Project) -> Result<Project, DatabaseError> {
        self.fail("publish_project")
    }

    async fn unpublish_project(&self, _username: &str, _existing: &Project) -> Result<Project, DatabaseError> {
        self.fail("unpublish_project")
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub async fn json_body(res: reqwest::Response) -> Result<Value> {
    res.json::<Value>().await.context("response body is not JSON")
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{json_body, project, TestServer};
use project_api::auth::{generate_jwt, Claims};
use project_api::types::Role;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::with_projects(vec![]).await?;
    let res = reqwest::get(server.url("/health")).await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await?["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = TestServer::with_projects(vec![project("1", "Alpha", true)]).await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/projects")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(res).await?;
    assert_eq!(body["code"], "401");
    assert_eq!(body["self"], "Api/Projects");

    let res = client.post(server.url("/api/projects")).json(&json!({"name": "X"})).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() -> Result<()> {
    let server = TestServer::with_projects(vec![]).await?;
    let token = generate_jwt(&Claims::new("alice", &[Role::Staff], 1), "not-the-server-secret")?;

    let res = reqwest::Client::new()
        .get(server.url("/api/projects"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn public_role_cannot_reach_protected_routes() -> Result<()> {
    let server = TestServer::with_projects(vec![project("1", "Alpha", true)]).await?;
    let token = server.token("visitor", &[Role::Public]);

    let res = reqwest::Client::new()
        .put(server.url("/api/projects/1/unpublish"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(res).await?["code"], "403");

    let still_public = reqwest::get(server.url("/api/public/projects/1")).await?;
    assert_eq!(still_public.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn sysadmin_and_staff_are_both_accepted() -> Result<()> {
    let server = TestServer::with_projects(vec![]).await?;
    let client = reqwest::Client::new();

    for role in [Role::Sysadmin, Role::Staff] {
        let res = client
            .get(server.url("/api/projects"))
            .bearer_auth(server.token("carol", &[role]))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK, "role {:?}", role);
    }
    Ok(())
}

#[tokio::test]
async fn options_needs_no_token() -> Result<()> {
    let server = TestServer::with_projects(vec![]).await?;
    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/api/projects/1/publish"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.bytes().await?.is_empty());
    Ok(())
}

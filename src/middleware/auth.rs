use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::middleware::boundary::PROTECTED_RESOURCE;
use crate::state::AppState;
use crate::types::Role;

/// Authenticated caller extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn is_elevated(&self) -> bool {
        self.roles.iter().any(Role::is_elevated)
    }
}

/// Validates the bearer token on protected routes, requires a staff-level
/// role, and injects `AuthUser`. Preflight OPTIONS requests pass untouched.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let auth_user = match authenticate(&headers, &state.config.security.jwt_secret) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
            return e.into_response_for(PROTECTED_RESOURCE);
        }
    };

    request.extensions_mut().insert(auth_user);
    next.run(request).await
}

fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, ApiError> {
    let token = extract_jwt_from_headers(headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token, secret).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = AuthUser {
        roles: claims.known_roles(),
        username: claims.preferred_username,
    };
    if user.username.trim().is_empty() {
        return Err(ApiError::unauthorized("Token has no preferred_username"));
    }
    if !user.is_elevated() {
        return Err(ApiError::forbidden(format!(
            "User '{}' lacks a sysadmin or staff role",
            user.username
        )));
    }
    Ok(user)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use axum::http::HeaderValue;

    const SECRET: &str = "unit-secret";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn bearer(username: &str, roles: &[Role]) -> HeaderMap {
        let token = generate_jwt(&Claims::new(username, roles, 1), SECRET).unwrap();
        headers(&format!("Bearer {}", token))
    }

    #[test]
    fn accepts_staff_token() {
        let user = authenticate(&bearer("alice", &[Role::Staff]), SECRET).unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.is_elevated());
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = authenticate(&HeaderMap::new(), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn non_bearer_scheme_is_unauthorized() {
        let err = authenticate(&headers("Basic abc"), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn public_only_token_is_forbidden() {
        let err = authenticate(&bearer("bob", &[Role::Public]), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use serde::Serialize;

use super::response::ApiResult;
use crate::error::ApiError;

/// `self` value reported by public routes
pub const PUBLIC_RESOURCE: &str = "Api/Public/Projects";
/// `self` value reported by protected routes
pub const PROTECTED_RESOURCE: &str = "Api/Projects";

/// Identity of a handler for logging and error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub verb: &'static str,
    pub route: &'static str,
    pub resource: &'static str,
}

impl Endpoint {
    pub const fn new(verb: &'static str, route: &'static str, resource: &'static str) -> Self {
        Self { verb, route, resource }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}/{}", self.verb, self.route)
    }
}

/// Run a handler body and turn its outcome into exactly one response.
///
/// Logs entry and exit at debug level. Server-side failures, including a
/// panic inside `operation`, are logged with full detail and answered with
/// the fixed 500 body; client errors are answered with their own body.
pub async fn guard<T, F>(endpoint: Endpoint, operation: F) -> Response
where
    T: Serialize,
    F: Future<Output = ApiResult<T>>,
{
    tracing::debug!(verb = endpoint.verb, route = endpoint.route, ">>> {}", endpoint);

    let outcome = match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ApiError::Internal(format!("handler panicked: {}", detail)))
        }
    };

    let response = match outcome {
        Ok(response) => response.into_response(),
        Err(e) => {
            if e.is_server_error() {
                tracing::error!(verb = endpoint.verb, route = endpoint.route, "### Error in {}: {:?}", endpoint, e);
            } else {
                tracing::debug!(verb = endpoint.verb, route = endpoint.route, status = e.status_code().as_u16(), "{}: {}", endpoint, e);
            }
            e.into_response_for(endpoint.resource)
        }
    };

    tracing::debug!(verb = endpoint.verb, route = endpoint.route, "<<< {}", endpoint);
    response
}

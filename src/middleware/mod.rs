pub mod auth;
pub mod boundary;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use boundary::{guard, Endpoint, PROTECTED_RESOURCE, PUBLIC_RESOURCE};
pub use response::{ApiResponse, ApiResult};

// handlers/protected/mod.rs - Protected project handlers
//
// Security Level: JWT with a sysadmin or staff role (see middleware::auth)
// Route Prefix: /api/projects
// User Context: handlers receive AuthUser via Extension; its username is
// recorded as createdBy/updatedBy

pub mod projects;

pub use projects::*;

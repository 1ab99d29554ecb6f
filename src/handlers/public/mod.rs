// handlers/public/mod.rs - Public project handlers (no authentication required)
//
// Security Level: None
// Route Prefix: /api/public/projects
// Visibility: PUBLIC_ROLES, so only published projects with audit fields removed

pub mod projects;

pub use projects::*;

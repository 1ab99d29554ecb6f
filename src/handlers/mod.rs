// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth with a sysadmin or staff role)
pub mod public;    // /api/public/projects
pub mod protected; // /api/projects
pub mod utils;

pub mod project;

pub use project::{Project, ProjectPage, ProjectPayload};

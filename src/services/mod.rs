pub mod params;
pub mod project_service;

pub use params::{PagingParams, ProjectParams, ProjectQuery};
pub use project_service::{ProjectData, ProjectService};

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::ProjectGateway;
use crate::services::ProjectService;

/// Shared, cloneable state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn ProjectGateway>, config: AppConfig) -> Self {
        Self {
            projects: ProjectService::new(gateway, config.api.max_page_size),
            config: Arc::new(config),
        }
    }
}

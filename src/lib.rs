pub mod config;
pub mod datasource;
pub mod errors;
pub mod models;
pub mod rest;
pub mod screens;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{AppError, SharedReporter, TracingReporter};
use crate::rest::RestClient;
use crate::services::layout::Layout;
use crate::services::state_cache::RouteStateCache;

/// Session-scoped collaborators, passed explicitly down through page
/// construction. All of these live for the whole application session.
#[derive(Clone)]
pub struct Session {
    pub config: AppConfig,
    pub client: Arc<RestClient>,
    pub layout: Arc<Layout>,
    pub route_cache: Arc<RouteStateCache>,
    pub errors: SharedReporter,
}

impl Session {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let client = Arc::new(RestClient::new(&config)?);
        Ok(Self {
            config,
            client,
            layout: Arc::new(Layout::default()),
            route_cache: Arc::new(RouteStateCache::new()),
            errors: Arc::new(TracingReporter),
        })
    }
}

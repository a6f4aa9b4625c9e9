pub mod api_doc;
pub mod config;
pub mod error;
pub mod faker;
pub mod formats;
pub mod handlers;
pub mod observability;
pub mod providers;
pub mod registry;
pub mod routes;
pub mod types;

use config::Settings;
use observability::AppMetrics;
use registry::ProviderRegistry;
use std::sync::Arc;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<ProviderRegistry>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            registry: Arc::new(ProviderRegistry::new()),
            metrics: Arc::new(AppMetrics::new()),
        }
    }
}

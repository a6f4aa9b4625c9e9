use crate::config::LoggingConfig;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::ToSchema;

/// Application metrics
#[derive(Debug, Clone)]
pub struct AppMetrics {
    pub start_time: Instant,
    pub total_requests: Arc<RwLock<u64>>,
    pub successful_requests: Arc<RwLock<u64>>,
    pub failed_requests: Arc<RwLock<u64>>,
    pub files_generated: Arc<RwLock<u64>>,
    pub bytes_generated: Arc<RwLock<u64>>,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: Arc::new(RwLock::new(0)),
            successful_requests: Arc::new(RwLock::new(0)),
            failed_requests: Arc::new(RwLock::new(0)),
            files_generated: Arc::new(RwLock::new(0)),
            bytes_generated: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn increment_requests(&self) {
        *self.total_requests.write().await += 1;
    }

    pub async fn increment_success(&self) {
        *self.successful_requests.write().await += 1;
    }

    pub async fn increment_failure(&self) {
        *self.failed_requests.write().await += 1;
    }

    pub async fn record_file(&self, size: usize) {
        *self.files_generated.write().await += 1;
        *self.bytes_generated.write().await += size as u64;
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub async fn snapshot(&self) -> MetricsResponse {
        let total = *self.total_requests.read().await;
        let success = *self.successful_requests.read().await;

        let success_rate = if total > 0 {
            (success as f64 / total as f64) * 100.0
        } else {
            100.0
        };

        MetricsResponse {
            uptime_seconds: self.uptime_seconds(),
            total_requests: total,
            successful_requests: success,
            failed_requests: *self.failed_requests.read().await,
            files_generated: *self.files_generated.read().await,
            bytes_generated: *self.bytes_generated.read().await,
            success_rate,
        }
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Request counters
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub files_generated: u64,
    pub bytes_generated: u64,
    pub success_rate: f64,
}

/// Metrics endpoint handler
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Request counters", body = MetricsResponse)
    ),
    tag = "Service"
)]
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot().await))
}

/// Initialize tracing subscriber for structured logging
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "faker_file_api={level},tower_http={level}",
            level = logging.level
        )
    });

    let filter_clone = filter.clone();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    if logging.format == "pretty" {
        builder.pretty().init();
    } else {
        builder.json().init();
    }

    info!("Tracing initialized with filter: {}", filter_clone);
}

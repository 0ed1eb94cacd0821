pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod nba;
pub mod projections;
pub mod scoring;
pub mod services;

use crate::config::AppConfig;
use crate::nba::StatsClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub stats: StatsClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

//! Liveness, readiness and build probes
//!
//! Readiness is computed from the last result of each background component
//! check rather than by touching the database on every probe.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::db::AnimalRepository;

/// Component name used for the animal store
pub const DATABASE: &str = "database";

/// Ordered from best to worst, so the overall status is the maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        *self == HealthStatus::Healthy
    }

    /// Degraded still serves traffic
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub last_check: DateTime<Utc>,
}

impl ComponentHealth {
    pub fn new(status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            last_check: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, ComponentHealth>,
    pub timestamp: DateTime<Utc>,
}

/// Build metadata, filled from the environment at compile time when present
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub build_time: &'static str,
    pub rust_version: &'static str,
}

const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(value) => value,
        None => "unknown",
    }
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    commit: or_unknown(option_env!("GIT_COMMIT")),
    build_time: or_unknown(option_env!("BUILD_TIME")),
    rust_version: or_unknown(option_env!("RUSTC_VERSION")),
};

/// Last known health of every monitored component
#[derive(Debug, Default)]
pub struct HealthState {
    components: RwLock<HashMap<String, ComponentHealth>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, component: &str, health: ComponentHealth) {
        self.components.write().await.insert(component.to_string(), health);
    }

    /// Worst component status; healthy when nothing has been checked yet
    pub async fn overall(&self) -> HealthStatus {
        self.components
            .read()
            .await
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }

    pub async fn snapshot(&self) -> HashMap<String, ComponentHealth> {
        self.components.read().await.clone()
    }
}

/// `GET /healthz`: the process is up, no dependencies consulted
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Service is running".to_string()),
        timestamp: Utc::now(),
    })
}

/// `GET /readyz`
pub async fn ready_check(State(health): State<Arc<HealthState>>) -> (StatusCode, Json<ReadyResponse>) {
    let status = health.overall().await;
    let response = ReadyResponse {
        status,
        checks: health.snapshot().await,
        timestamp: Utc::now(),
    };
    (status.to_status_code(), Json(response))
}

/// `GET /build`
pub async fn build_info() -> Json<BuildInfo> {
    Json(BUILD_INFO)
}

/// Probe the animal store once
pub async fn check_database(animals: &dyn AnimalRepository) -> ComponentHealth {
    match animals.health_check().await {
        Ok(()) => ComponentHealth::new(HealthStatus::Healthy, "Database connection is healthy"),
        Err(e) => ComponentHealth::new(HealthStatus::Unhealthy, e.to_string()),
    }
}

/// Re-check the animal store every `every` until the task is dropped
pub async fn health_monitor(health: Arc<HealthState>, animals: Arc<dyn AnimalRepository>, every: Duration) {
    let mut ticker = tokio::time::interval(every);

    loop {
        ticker.tick().await;

        let database = check_database(animals.as_ref()).await;
        if !database.status.is_healthy() {
            tracing::warn!(message = ?database.message, "Database health check failed");
        }
        health.record(DATABASE, database).await;
    }
}

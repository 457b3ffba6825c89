//! Structured logging for the zoo registry
//!
//! Production emits one JSON object per event; every other environment gets
//! human-readable output. `RUST_LOG` always wins over the configured level.

use std::time::{Duration, Instant};

use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Output format of the log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn for_environment(environment: &str) -> Self {
        if environment.eq_ignore_ascii_case("production") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Filter directives used when `RUST_LOG` is unset
pub fn default_directives(log_level: &str) -> String {
    format!("zoo_registry={log_level},tower_http=debug,sqlx=warn")
}

/// Install the global tracing subscriber
pub fn init_tracing(server: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&server.log_level)));
    let format = LogFormat::for_environment(&server.environment);

    // Exactly one of the two layers is present
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
    });
    let pretty = (format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to initialize tracing: {}", e)))?;

    tracing::info!(
        environment = %server.environment,
        log_level = %server.log_level,
        format = ?format,
        "Logging initialized"
    );
    Ok(())
}

/// Span around a single animal table statement
#[macro_export]
macro_rules! db_span {
    ($statement:expr) => {
        tracing::debug_span!(
            "db",
            statement = $statement,
            animal_id = tracing::field::Empty,
            rows_affected = tracing::field::Empty,
        )
    };
}

/// Measures one operation and logs its duration when stopped
#[derive(Debug)]
pub struct Timer {
    label: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }

    pub fn stop(self) -> Duration {
        let elapsed = self.started.elapsed();
        tracing::debug!(operation = self.label, elapsed_ms = elapsed.as_millis() as u64, "Timed operation");
        elapsed
    }
}

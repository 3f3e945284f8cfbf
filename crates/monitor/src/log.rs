//! LogMonitor - writes records straight to the tracing logger
//!
//! Useful in development or when no backend is configured; no buffering,
//! no batching, no backpressure.

use chrono::{DateTime, Utc};
use contracts::{FieldValue, Fields, Monitor, Tags};
use tracing::{error, info};

/// Monitor implementation that logs every record
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMonitor;

impl LogMonitor {
    /// Create a new LogMonitor
    pub fn new() -> Self {
        Self
    }
}

impl Monitor for LogMonitor {
    async fn insert_record(
        &self,
        measurement: &str,
        value: FieldValue,
        tags: Option<Tags>,
        fields: Option<Fields>,
        at: DateTime<Utc>,
    ) {
        info!(
            metric = measurement,
            value = %value,
            tags = ?tags.unwrap_or_default(),
            fields = ?fields.unwrap_or_default(),
            at = %at,
            "metric recorded"
        );
    }

    async fn count(
        &self,
        measurement: &str,
        value: f64,
        tags: Option<Tags>,
        fields: Option<Fields>,
    ) {
        info!(
            metric = measurement,
            value,
            tags = ?tags.unwrap_or_default(),
            fields = ?fields.unwrap_or_default(),
            "metric recorded"
        );
    }

    async fn count_error(
        &self,
        measurement: &str,
        value: f64,
        error: &(dyn std::error::Error + Send + Sync),
    ) {
        error!(metric = measurement, value, error = %error, "metric recorded");
    }

    async fn count_simple(&self, measurement: &str, value: f64) {
        info!(metric = measurement, value, "metric recorded");
    }
}

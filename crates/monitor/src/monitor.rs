//! BufferedMonitor - public submission API and pipeline construction

use std::sync::Arc;

use chrono::{DateTime, Utc};
use contracts::{
    FieldValue, Fields, MetricPoint, MetricsBackend, Monitor, MonitorConfig, MonitorError, Tags,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::daemon::BatchDaemon;
use crate::handle::MonitorHandle;
use crate::probe;
use crate::record;

/// Cloneable submission handle feeding the batch daemon
///
/// All submission operations hand the constructed point to the daemon over
/// a channel holding a single in-flight point; while the daemon is blocked
/// in a backend write, callers park in `send`. That backpressure is
/// deliberate: a slow backend slows producers down instead of buffering
/// submissions without bound in front of the daemon.
#[derive(Clone)]
pub struct BufferedMonitor {
    tx: mpsc::Sender<MetricPoint>,
    service_name: Option<String>,
}

impl BufferedMonitor {
    async fn submit(
        &self,
        measurement: &str,
        value: FieldValue,
        tags: Option<Tags>,
        fields: Option<Fields>,
        at: DateTime<Utc>,
    ) {
        let Some(point) = record::new_record(
            self.service_name.as_deref(),
            measurement,
            value,
            tags,
            fields,
            at,
        ) else {
            return;
        };

        if self.tx.send(point).await.is_err() {
            debug!(measurement, "monitor closed, point discarded");
        }
    }
}

impl Monitor for BufferedMonitor {
    async fn insert_record(
        &self,
        measurement: &str,
        value: FieldValue,
        tags: Option<Tags>,
        fields: Option<Fields>,
        at: DateTime<Utc>,
    ) {
        self.submit(measurement, value, tags, fields, at).await;
    }

    async fn count(
        &self,
        measurement: &str,
        value: f64,
        tags: Option<Tags>,
        fields: Option<Fields>,
    ) {
        self.submit(measurement, value.into(), tags, fields, Utc::now())
            .await;
    }

    async fn count_error(
        &self,
        measurement: &str,
        value: f64,
        error: &(dyn std::error::Error + Send + Sync),
    ) {
        let tags = Tags::from([("error".to_string(), error.to_string())]);
        self.submit(measurement, value.into(), Some(tags), None, Utc::now())
            .await;
    }

    async fn count_simple(&self, measurement: &str, value: f64) {
        self.submit(measurement, value.into(), None, None, Utc::now())
            .await;
    }
}

/// Validate the configuration, spawn the batch daemon and the connectivity
/// probe, and return the submission handle plus the lifecycle handle
///
/// Fails fast on an inconsistent configuration; backend unavailability is
/// not an error here - the daemon logs write failures as they happen.
///
/// # Errors
/// Configuration validation errors (see [`MonitorConfig::validate`]).
pub fn create_monitor<B>(
    config: MonitorConfig,
    backend: B,
) -> Result<(BufferedMonitor, MonitorHandle), MonitorError>
where
    B: MetricsBackend + Send + Sync + 'static,
{
    config.validate()?;

    let backend = Arc::new(backend);
    let (tx, rx) = mpsc::channel(1);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let daemon = BatchDaemon::new(Arc::clone(&backend), &config, rx, shutdown_rx.clone());
    let daemon_task = tokio::spawn(daemon.run());
    let probe_task = tokio::spawn(probe::connectivity_probe(backend, shutdown_rx));

    info!(
        addr = %config.addr,
        namespace = %config.namespace,
        batch_write_interval = ?config.batch_write_interval,
        base_buffer_size = config.base_buffer_size,
        max_buffer_size = config.max_buffer_size,
        service_name = config.service_name.as_deref().unwrap_or(""),
        "metrics monitor started"
    );

    let monitor = BufferedMonitor {
        tx,
        service_name: config.service_name,
    };

    Ok((monitor, MonitorHandle::new(shutdown_tx, daemon_task, probe_task)))
}

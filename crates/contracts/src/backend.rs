//! MetricsBackend trait - outbound batch-write interface
//!
//! Defines the abstract interface the batch daemon writes through.

use std::time::Duration;

use crate::{MetricPoint, MonitorError};

/// Time-series backend client trait
///
/// Supplied by the host application (e.g. an HTTP line-protocol client).
/// `write` is all-or-nothing from the daemon's point of view: a partial
/// apply must still be reported as an error. Both calls may block for the
/// duration of slow network I/O; any timeout policy lives in the
/// implementation, the daemon never bounds a call itself.
///
/// Only the batch daemon calls `write` and only the connectivity probe
/// calls `ping`, so implementations never see concurrent calls to the
/// same method.
#[trait_variant::make(MetricsBackend: Send)]
pub trait LocalMetricsBackend {
    /// Submit one batch of points
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&self, batch: &[MetricPoint]) -> Result<(), MonitorError>;

    /// Liveness probe
    async fn ping(&self, timeout: Duration) -> Result<(), MonitorError>;
}

//! BatchDaemon - the single task owning the point buffer
//!
//! Event loop over three sources: the flush timer, the point channel and
//! the shutdown signal. At most one flush attempt is ever in flight, since
//! the loop itself is the only caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use contracts::{FieldValue, MetricPoint, MetricsBackend, MonitorConfig};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error};

use crate::buffer::PointBuffer;
use crate::record;

/// Reserved measurement name for the synthetic self-monitoring point
/// recording the buffered point count at flush time
pub const QUEUE_LENGTH_MEASUREMENT: &str = "queue-length";

/// Background task draining the point channel into backend batches
pub(crate) struct BatchDaemon<B> {
    backend: Arc<B>,
    namespace: String,
    service_name: Option<String>,
    batch_write_interval: Duration,
    buffer: PointBuffer,
    rx: mpsc::Receiver<MetricPoint>,
    shutdown: watch::Receiver<bool>,
}

impl<B: MetricsBackend + Sync> BatchDaemon<B> {
    pub(crate) fn new(
        backend: Arc<B>,
        config: &MonitorConfig,
        rx: mpsc::Receiver<MetricPoint>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            backend,
            namespace: config.namespace.clone(),
            service_name: config.service_name.clone(),
            batch_write_interval: config.batch_write_interval,
            buffer: PointBuffer::new(config.base_buffer_size, config.max_buffer_size),
            rx,
            shutdown,
        }
    }

    /// Run until the shutdown signal fires or every submission handle is
    /// dropped; either way one final flush attempt is made before exiting.
    pub(crate) async fn run(mut self) {
        debug!("batch daemon started");

        // The interval is measured from the end of the previous timer-driven
        // attempt, not from a fixed wall-clock grid.
        let timer = tokio::time::sleep(self.batch_write_interval);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                () = timer.as_mut() => {
                    self.flush_buffered().await;
                    timer.as_mut().reset(Instant::now() + self.batch_write_interval);
                }

                point = self.rx.recv() => {
                    match point {
                        Some(point) => {
                            self.buffer.push(point);
                            if self.buffer.at_threshold() {
                                self.flush_buffered().await;
                            }
                        }
                        None => {
                            debug!(
                                point_count = self.buffer.len(),
                                "all submission handles dropped, flushing buffer"
                            );
                            self.flush_buffered().await;
                            return;
                        }
                    }
                }

                // Ok: shutdown signalled. Err: the lifecycle handle was
                // dropped without close; treat it the same way.
                _ = self.shutdown.changed() => {
                    // A point already handed into the channel still makes
                    // the final batch.
                    while let Ok(point) = self.rx.try_recv() {
                        self.buffer.push(point);
                    }
                    debug!(
                        point_count = self.buffer.len(),
                        "monitor closing, flushing buffer"
                    );
                    self.flush_buffered().await;
                    return;
                }
            }
        }
    }

    /// One flush attempt: no-op on an empty buffer, otherwise write the
    /// whole buffer plus a best-effort queue-length point and apply the
    /// adaptive-threshold accounting.
    async fn flush_buffered(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let mut batch = self.buffer.take();
        let user_len = batch.len();

        // Best-effort: a batch without its queue-length point still goes out.
        if let Some(point) = self.queue_length_point(user_len) {
            batch.push(point);
        }

        match self.backend.write(&batch).await {
            Ok(()) => {
                self.buffer.record_success();
                debug!(point_count = batch.len(), "batch write succeeded");
            }
            Err(e) => {
                error!(
                    namespace = %self.namespace,
                    error = %e,
                    "batch write to metrics backend failed"
                );

                batch.truncate(user_len);
                if self.buffer.record_failure(batch) {
                    error!(
                        namespace = %self.namespace,
                        point_count = user_len,
                        "batch write failed and buffered size reached max_buffer_size, buffer was discarded"
                    );
                }
            }
        }
    }

    fn queue_length_point(&self, queue_len: usize) -> Option<MetricPoint> {
        record::new_record(
            self.service_name.as_deref(),
            QUEUE_LENGTH_MEASUREMENT,
            FieldValue::Unsigned(queue_len as u64),
            None,
            None,
            Utc::now(),
        )
    }
}

//! MonitorHandle - lifecycle handle for graceful shutdown

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Handle owning the pipeline's background tasks
///
/// Returned by [`create_monitor`](crate::create_monitor); hold on to it for
/// the lifetime of the process and call [`close`](MonitorHandle::close)
/// exactly once during graceful termination. Dropping the handle without
/// closing also stops the tasks, but without waiting for the final flush.
pub struct MonitorHandle {
    shutdown_tx: watch::Sender<bool>,
    daemon: JoinHandle<()>,
    probe: JoinHandle<()>,
}

impl MonitorHandle {
    pub(crate) fn new(
        shutdown_tx: watch::Sender<bool>,
        daemon: JoinHandle<()>,
        probe: JoinHandle<()>,
    ) -> Self {
        Self {
            shutdown_tx,
            daemon,
            probe,
        }
    }

    /// Signal the daemon to stop and wait until it has attempted its final
    /// flush and exited
    ///
    /// Blocks for exactly one flush attempt. The attempt itself is not
    /// time-bounded: a backend write that never returns hangs this call.
    /// Bounding writes is the backend implementation's responsibility.
    pub async fn close(self) {
        debug!("closing metrics monitor");

        let _ = self.shutdown_tx.send(true);

        if let Err(e) = self.daemon.await {
            error!(error = ?e, "batch daemon task panicked");
        }
        if let Err(e) = self.probe.await {
            error!(error = ?e, "connectivity probe task panicked");
        }

        debug!("metrics monitor closed");
    }
}

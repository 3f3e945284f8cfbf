//! Periodic backend connectivity probe
//!
//! Purely diagnostic: ping failures are logged and never affect the
//! buffer or the flush schedule.

use std::sync::Arc;
use std::time::Duration;

use contracts::MetricsBackend;
use tokio::sync::watch;
use tracing::{debug, warn};

const PROBE_INTERVAL: Duration = Duration::from_secs(5 * 60);
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Ping the backend at startup and then on a fixed interval, until the
/// lifecycle signal fires
pub(crate) async fn connectivity_probe<B: MetricsBackend + Sync>(
    backend: Arc<B>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tick = tokio::time::interval(PROBE_INTERVAL);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = backend.ping(PING_TIMEOUT).await {
                    warn!(error = %e, "couldn't ping metrics backend");
                }
            }
            _ = shutdown.changed() => {
                debug!("monitor closed, stopping connectivity pings");
                return;
            }
        }
    }
}

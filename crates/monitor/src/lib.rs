//! # Monitor
//!
//! Buffered metrics pipeline between application code and a time-series
//! backend.
//!
//! Responsibilities:
//! - Accept metric submissions from arbitrary concurrent callers
//! - Accumulate points in a single-owner buffer (no locks)
//! - Flush batches on a size threshold or a timer, whichever fires first
//! - Adapt the threshold to backend failures with bounded memory
//! - Flush once more on shutdown before reporting completion
//!
//! Producers feel the backend's slowness: the point channel holds a single
//! in-flight point, so submissions park while the daemon is mid-write.

pub mod buffer;
pub mod handle;
pub mod log;
pub mod monitor;

mod daemon;
mod probe;
mod record;

pub use contracts::{
    FieldValue, Fields, MetricPoint, MetricsBackend, Monitor, MonitorConfig, MonitorError, Tags,
};

pub use buffer::PointBuffer;
pub use daemon::QUEUE_LENGTH_MEASUREMENT;
pub use handle::MonitorHandle;
pub use log::LogMonitor;
pub use monitor::{create_monitor, BufferedMonitor};

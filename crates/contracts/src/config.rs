//! Monitor configuration contracts shared across crates.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Default interval between timer-driven batch writes
pub const DEFAULT_BATCH_WRITE_INTERVAL: Duration = Duration::from_secs(60);

/// Default point count that triggers an immediate batch write
///
/// Time-series backends generally recommend batches of 5,000-10,000
/// points.
pub const DEFAULT_BASE_BUFFER_SIZE: usize = 5000;

/// Default hard cap on buffered points across a flush boundary
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 10000;

/// Backend credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

// Password must never reach log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Monitor pipeline configuration
///
/// Loaded once at construction time; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Backend address (scheme + host)
    pub addr: String,

    /// Backend credentials
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Database / namespace points are written into
    pub namespace: String,

    /// Optional service name, merged into every point as `tags["service"]`
    #[serde(default)]
    pub service_name: Option<String>,

    /// Interval between timer-driven batch writes
    #[serde(default = "default_batch_write_interval")]
    pub batch_write_interval: Duration,

    /// Point count that triggers an immediate batch write
    #[serde(default = "default_base_buffer_size")]
    pub base_buffer_size: usize,

    /// Hard cap on buffered points; reaching it after a failed write
    /// discards the buffer (bounded loss)
    #[serde(default = "default_max_buffer_size")]
    pub max_buffer_size: usize,
}

fn default_batch_write_interval() -> Duration {
    DEFAULT_BATCH_WRITE_INTERVAL
}

fn default_base_buffer_size() -> usize {
    DEFAULT_BASE_BUFFER_SIZE
}

fn default_max_buffer_size() -> usize {
    DEFAULT_MAX_BUFFER_SIZE
}

impl MonitorConfig {
    /// Create a configuration with default batching parameters
    pub fn new(addr: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            credentials: None,
            namespace: namespace.into(),
            service_name: None,
            batch_write_interval: DEFAULT_BATCH_WRITE_INTERVAL,
            base_buffer_size: DEFAULT_BASE_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }

    /// Validate batching invariants
    ///
    /// # Errors
    /// - Empty namespace
    /// - `base_buffer_size == 0` (would flush on every point)
    /// - `base_buffer_size > max_buffer_size`
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.namespace.trim().is_empty() {
            return Err(MonitorError::config_validation(
                "namespace",
                "namespace is empty",
            ));
        }

        if self.base_buffer_size == 0 {
            return Err(MonitorError::config_validation(
                "base_buffer_size",
                "base_buffer_size must be at least 1",
            ));
        }

        if self.base_buffer_size > self.max_buffer_size {
            return Err(MonitorError::config_validation(
                "base_buffer_size",
                format!(
                    "base_buffer_size ({}) can not be greater than max_buffer_size ({})",
                    self.base_buffer_size, self.max_buffer_size
                ),
            ));
        }

        Ok(())
    }
}

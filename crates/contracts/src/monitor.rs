//! Monitor trait - the metric submission interface
//!
//! Implemented by the buffered pipeline and by the plain log monitor.

use chrono::{DateTime, Utc};

use crate::{FieldValue, Fields, Tags};

/// Metric submission trait
///
/// Safe to call from any number of concurrent tasks. None of the
/// operations return errors: a metric that cannot be recorded is logged
/// and dropped, never surfaced to the caller. Calls may park while the
/// pipeline is busy writing a batch downstream; that backpressure is part
/// of the contract.
#[trait_variant::make(Monitor: Send)]
pub trait LocalMonitor {
    /// Record one measurement at an explicit timestamp
    ///
    /// `value` is stored under the reserved `"value"` field; `fields`
    /// supplies any additional field values.
    async fn insert_record(
        &self,
        measurement: &str,
        value: FieldValue,
        tags: Option<Tags>,
        fields: Option<Fields>,
        at: DateTime<Utc>,
    );

    /// Record a value at the current time
    async fn count(&self, measurement: &str, value: f64, tags: Option<Tags>, fields: Option<Fields>);

    /// Record a value with the given error's message stored in an
    /// `error` tag
    async fn count_error(
        &self,
        measurement: &str,
        value: f64,
        error: &(dyn std::error::Error + Send + Sync),
    );

    /// Record a value with no tags or extra fields
    async fn count_simple(&self, measurement: &str, value: f64);
}

//! MetricPoint - the atomic unit of buffering
//!
//! One timestamped measurement with tags and fields. Immutable once
//! constructed; construction validates everything the backend would
//! otherwise reject mid-batch.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Tag set: indexed string key/value pairs
pub type Tags = HashMap<String, String>;

/// Field set: measured values by field name
pub type Fields = HashMap<String, FieldValue>;

/// A single field value
///
/// Untagged for serialization; integer variants come first so whole
/// numbers round-trip without degrading to floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Signed integer
    Integer(i64),
    /// Unsigned integer
    Unsigned(u64),
    /// 64-bit float
    Float(f64),
    /// Boolean
    Boolean(bool),
    /// Free-form string
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Unsigned(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One timestamped measurement
///
/// Owned by the batch daemon from submission until it is flushed to the
/// backend or discarded on buffer overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Measurement name
    pub measurement: String,
    /// Indexed tags
    pub tags: Tags,
    /// Field values (always contains at least one field)
    pub fields: Fields,
    /// Submission timestamp
    pub at: DateTime<Utc>,
}

impl MetricPoint {
    /// Construct a validated point
    ///
    /// # Errors
    /// - Empty measurement name
    /// - Empty field set (backends require at least one field)
    /// - Empty tag or field key
    /// - Non-finite float field (NaN / ±Inf)
    pub fn new(
        measurement: impl Into<String>,
        tags: Tags,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<Self, MonitorError> {
        let measurement = measurement.into();
        Self::validate(&measurement, &tags, &fields)?;

        Ok(Self {
            measurement,
            tags,
            fields,
            at,
        })
    }

    /// Check point data without consuming it
    ///
    /// # Errors
    /// Same conditions as [`MetricPoint::new`].
    pub fn validate(measurement: &str, tags: &Tags, fields: &Fields) -> Result<(), MonitorError> {
        if measurement.trim().is_empty() {
            return Err(MonitorError::invalid_point(
                measurement,
                "measurement name is empty",
            ));
        }

        if fields.is_empty() {
            return Err(MonitorError::invalid_point(
                measurement,
                "point has no fields",
            ));
        }

        for key in tags.keys() {
            if key.trim().is_empty() {
                return Err(MonitorError::invalid_point(measurement, "empty tag key"));
            }
        }

        for (key, value) in fields {
            if key.trim().is_empty() {
                return Err(MonitorError::invalid_point(measurement, "empty field key"));
            }
            if let FieldValue::Float(v) = value {
                if !v.is_finite() {
                    return Err(MonitorError::invalid_point(
                        measurement,
                        format!("non-finite float in field '{key}'"),
                    ));
                }
            }
        }

        Ok(())
    }
}

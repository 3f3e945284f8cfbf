//! Layered error definitions
//!
//! Categorized by source: config / point / backend

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum MonitorError {
    // ===== Configuration Errors =====
    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Point Errors =====
    /// Metric point construction error
    #[error("invalid point for measurement '{measurement}': {message}")]
    InvalidPoint {
        measurement: String,
        message: String,
    },

    // ===== Backend Errors =====
    /// Batch write error
    #[error("backend write to '{namespace}' failed: {message}")]
    BackendWrite { namespace: String, message: String },

    /// Connectivity probe error
    #[error("backend ping failed: {message}")]
    BackendPing { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create point construction error
    pub fn invalid_point(measurement: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPoint {
            measurement: measurement.into(),
            message: message.into(),
        }
    }

    /// Create backend write error
    pub fn backend_write(namespace: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendWrite {
            namespace: namespace.into(),
            message: message.into(),
        }
    }

    /// Create connectivity probe error
    pub fn backend_ping(message: impl Into<String>) -> Self {
        Self::BackendPing {
            message: message.into(),
        }
    }
}

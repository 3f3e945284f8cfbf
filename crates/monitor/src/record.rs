//! Point assembly shared by the ingress API and the batch daemon.

use chrono::{DateTime, Utc};
use contracts::{FieldValue, Fields, MetricPoint, Tags};
use tracing::error;

/// Reserved field key carrying the primary value of every record
pub(crate) const VALUE_FIELD: &str = "value";

/// Reserved tag key carrying the configured service name
pub(crate) const SERVICE_TAG: &str = "service";

/// Build a point from submission arguments
///
/// Merges `value` into `fields["value"]` and, when a non-empty service
/// name is configured, the service name into `tags["service"]`. A point
/// that fails validation is logged with its full context and dropped;
/// submission never surfaces an error to the caller.
pub(crate) fn new_record(
    service_name: Option<&str>,
    measurement: &str,
    value: FieldValue,
    tags: Option<Tags>,
    fields: Option<Fields>,
    at: DateTime<Utc>,
) -> Option<MetricPoint> {
    let mut fields = fields.unwrap_or_default();
    fields.insert(VALUE_FIELD.to_string(), value);

    let mut tags = tags.unwrap_or_default();
    if let Some(service) = service_name {
        if !service.is_empty() {
            tags.insert(SERVICE_TAG.to_string(), service.to_string());
        }
    }

    if let Err(e) = MetricPoint::validate(measurement, &tags, &fields) {
        error!(
            measurement,
            tags = ?tags,
            fields = ?fields,
            error = %e,
            "couldn't construct metric point, dropping it"
        );
        return None;
    }

    Some(MetricPoint {
        measurement: measurement.to_string(),
        tags,
        fields,
        at,
    })
}

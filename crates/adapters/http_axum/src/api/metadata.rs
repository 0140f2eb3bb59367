//! Sensor metadata extraction for image uploads.
//!
//! Devices send the JPEG as the raw request body, so the sensor document
//! travels alongside it in `X-*` headers and/or the query string. Query
//! parameters win when both are present.

use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;

use camguard_domain::error::ValidationError;
use camguard_domain::time::parse_rfc3339;
use camguard_domain::violation::{SensorReadings, ViolationType};

pub const VIOLATION_TYPE_HEADER: &str = "x-violation-type";
pub const DEVICE_ID_HEADER: &str = "x-device-id";
pub const CAPTURED_AT_HEADER: &str = "x-captured-at";
/// JSON object of additional readings (e.g. `{"smokePpm": 412}`).
pub const SENSOR_DATA_HEADER: &str = "x-sensor-data";

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/jpg"];

/// Query parameters accepted by `POST /api/violations`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    #[serde(rename = "type")]
    pub violation_type: Option<String>,
    #[serde(alias = "device")]
    pub device_id: Option<String>,
    #[serde(alias = "timestamp")]
    pub captured_at: Option<String>,
}

/// Reject uploads whose `Content-Type` is not JPEG.
///
/// # Errors
///
/// Returns [`ValidationError::UnsupportedMediaType`] when the header is
/// missing or names another media type.
pub fn ensure_jpeg(headers: &HeaderMap) -> Result<(), ValidationError> {
    let raw = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = raw.split(';').next().unwrap_or_default().trim();

    if ACCEPTED_CONTENT_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
    {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedMediaType(raw.to_owned()))
    }
}

/// Assemble the sensor document from the query string and headers.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the type or device id is missing,
/// the type is unknown, the capture time is not RFC 3339, or the extra
/// readings header is not a JSON object.
pub fn sensor_readings(
    query: UploadQuery,
    headers: &HeaderMap,
) -> Result<SensorReadings, ValidationError> {
    let violation_type: ViolationType =
        query_or_header(query.violation_type, headers, VIOLATION_TYPE_HEADER)?
            .ok_or(ValidationError::MissingViolationType)?
            .parse()?;

    let device_id = query_or_header(query.device_id, headers, DEVICE_ID_HEADER)?
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingDeviceId)?;

    let mut readings = SensorReadings::new(violation_type, device_id);

    if let Some(captured_at) = query_or_header(query.captured_at, headers, CAPTURED_AT_HEADER)? {
        readings = readings.with_captured_at(parse_rfc3339(&captured_at)?);
    }

    if let Some(raw) = header(headers, SENSOR_DATA_HEADER)? {
        let extra: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|err| ValidationError::InvalidSensorData(err.to_string()))?;
        readings = readings.with_extra(extra);
    }

    Ok(readings)
}

/// The query value when present, otherwise the header; the header is not
/// read at all when the query supplies the field.
fn query_or_header(
    from_query: Option<String>,
    headers: &HeaderMap,
    name: &'static str,
) -> Result<Option<String>, ValidationError> {
    match from_query {
        Some(value) => Ok(Some(value)),
        None => header(headers, name),
    }
}

fn header(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, ValidationError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| ValidationError::InvalidSensorData(format!("{name} is not ASCII")))
        })
        .transpose()
}

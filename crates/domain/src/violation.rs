//! Violation — a captured image plus the sensor document describing it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CamGuardError, ValidationError};
use crate::id::ViolationId;
use crate::image::ImageData;
use crate::time::{Timestamp, now, to_stored_precision};

/// Kind of behaviour the device detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationType {
    Smoke,
    Spit,
}

impl ViolationType {
    /// Every known type, in declaration order.
    pub const ALL: [Self; 2] = [Self::Smoke, Self::Spit];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Spit => "spit",
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::InvalidViolationType(s.to_owned()))
    }
}

/// Sensor document sent alongside the image.
///
/// Fields the server does not know about are kept in `extra` and
/// round-trip through storage untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadings {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SensorReadings {
    /// Keys owned by the typed fields; never stored in `extra`.
    pub const RESERVED_KEYS: [&'static str; 3] = ["type", "deviceId", "capturedAt"];

    #[must_use]
    pub fn new(violation_type: ViolationType, device_id: impl Into<String>) -> Self {
        Self {
            violation_type,
            device_id: device_id.into(),
            captured_at: None,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_captured_at(mut self, captured_at: Timestamp) -> Self {
        self.captured_at = Some(captured_at);
        self
    }

    /// Merge additional readings, dropping any key that shadows a typed field.
    #[must_use]
    pub fn with_extra(mut self, extra: serde_json::Map<String, serde_json::Value>) -> Self {
        for (key, value) in extra {
            if !Self::RESERVED_KEYS.contains(&key.as_str()) {
                self.extra.insert(key, value);
            }
        }
        self
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingDeviceId`] when `device_id` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.device_id.trim().is_empty() {
            return Err(ValidationError::MissingDeviceId);
        }
        Ok(())
    }
}

/// A persisted detection event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: ViolationId,
    pub image_data: ImageData,
    pub sensor_readings: SensorReadings,
    pub created_at: Timestamp,
}

impl Violation {
    /// Create a builder for constructing a [`Violation`].
    #[must_use]
    pub fn builder() -> ViolationBuilder {
        ViolationBuilder::default()
    }

    #[must_use]
    pub fn violation_type(&self) -> ViolationType {
        self.sensor_readings.violation_type
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CamGuardError::Validation`] when the sensor document is invalid.
    pub fn validate(&self) -> Result<(), CamGuardError> {
        self.sensor_readings.validate()?;
        Ok(())
    }
}

/// Step-by-step builder for [`Violation`].
#[derive(Debug, Default)]
pub struct ViolationBuilder {
    id: Option<ViolationId>,
    image_data: Option<ImageData>,
    sensor_readings: Option<SensorReadings>,
    created_at: Option<Timestamp>,
}

impl ViolationBuilder {
    #[must_use]
    pub fn id(mut self, id: ViolationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn image_data(mut self, image_data: ImageData) -> Self {
        self.image_data = Some(image_data);
        self
    }

    #[must_use]
    pub fn sensor_readings(mut self, sensor_readings: SensorReadings) -> Self {
        self.sensor_readings = Some(sensor_readings);
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`Violation`].
    ///
    /// A fresh id and the current time are used when not provided.
    /// `created_at` is kept at microsecond precision.
    ///
    /// # Errors
    ///
    /// Returns [`CamGuardError::Validation`] if the image or sensor document
    /// is missing, or the sensor document is invalid.
    pub fn build(self) -> Result<Violation, CamGuardError> {
        let image_data = self.image_data.ok_or(ValidationError::EmptyImage)?;
        let sensor_readings = self
            .sensor_readings
            .ok_or(ValidationError::MissingViolationType)?;
        let violation = Violation {
            id: self.id.unwrap_or_default(),
            image_data,
            sensor_readings,
            created_at: self.created_at.map_or_else(now, to_stored_precision),
        };
        violation.validate()?;
        Ok(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageData {
        ImageData::new(vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap()
    }

    #[test]
    fn should_parse_violation_type_case_insensitively() {
        assert_eq!("smoke".parse::<ViolationType>(), Ok(ViolationType::Smoke));
        assert_eq!(" SPIT ".parse::<ViolationType>(), Ok(ViolationType::Spit));
    }

    #[test]
    fn should_reject_unknown_violation_type() {
        assert_eq!(
            "litter".parse::<ViolationType>(),
            Err(ValidationError::InvalidViolationType("litter".to_string()))
        );
    }

    #[test]
    fn should_build_violation_with_generated_id_and_timestamp() {
        let before = now();
        let violation = Violation::builder()
            .image_data(image())
            .sensor_readings(SensorReadings::new(ViolationType::Smoke, "cam1"))
            .build()
            .unwrap();

        assert!(violation.created_at >= before);
        assert_eq!(violation.violation_type(), ViolationType::Smoke);
    }

    #[test]
    fn should_keep_explicit_created_at_at_microsecond_precision() {
        let created_at = crate::time::parse_rfc3339("2026-03-01T10:00:00.987654321Z").unwrap();
        let violation = Violation::builder()
            .image_data(image())
            .sensor_readings(SensorReadings::new(ViolationType::Smoke, "cam1"))
            .created_at(created_at)
            .build()
            .unwrap();

        assert_eq!(violation.created_at.timestamp_subsec_nanos(), 987_654_000);
    }

    #[test]
    fn should_reject_build_when_image_missing() {
        let result = Violation::builder()
            .sensor_readings(SensorReadings::new(ViolationType::Spit, "cam1"))
            .build();
        assert!(matches!(
            result,
            Err(CamGuardError::Validation(ValidationError::EmptyImage))
        ));
    }

    #[test]
    fn should_reject_build_when_device_id_blank() {
        let result = Violation::builder()
            .image_data(image())
            .sensor_readings(SensorReadings::new(ViolationType::Spit, "  "))
            .build();
        assert!(matches!(
            result,
            Err(CamGuardError::Validation(ValidationError::MissingDeviceId))
        ));
    }

    #[test]
    fn should_drop_reserved_keys_from_extra_readings() {
        let mut extra = serde_json::Map::new();
        extra.insert("type".to_string(), serde_json::json!("spit"));
        extra.insert("smokeLevel".to_string(), serde_json::json!(412));

        let readings = SensorReadings::new(ViolationType::Smoke, "cam1").with_extra(extra);

        assert_eq!(readings.violation_type, ViolationType::Smoke);
        assert_eq!(readings.extra.len(), 1);
        assert_eq!(readings.extra["smokeLevel"], 412);
    }

    #[test]
    fn should_serialize_sensor_readings_with_flattened_extra() {
        let mut extra = serde_json::Map::new();
        extra.insert("distanceCm".to_string(), serde_json::json!(35));
        let readings = SensorReadings::new(ViolationType::Spit, "cam1").with_extra(extra);

        let json = serde_json::to_value(&readings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "spit", "deviceId": "cam1", "distanceCm": 35})
        );

        let parsed: SensorReadings = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, readings);
    }

    #[test]
    fn should_serialize_violation_with_camel_case_keys() {
        let violation = Violation::builder()
            .image_data(image())
            .sensor_readings(SensorReadings::new(ViolationType::Smoke, "cam1"))
            .build()
            .unwrap();

        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["imageData"], "/9j/4A==");
        assert_eq!(json["sensorReadings"]["type"], "smoke");
        assert!(json.get("createdAt").is_some());
    }
}

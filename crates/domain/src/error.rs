//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`CamGuardError`] via `#[from]`; adapters box their own error types into
//! [`CamGuardError::Storage`].

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum CamGuardError {
    /// Caller supplied malformed or out-of-bounds input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// User-correctable input errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("image data is missing")]
    EmptyImage,

    #[error("image exceeds the maximum size of {max} bytes")]
    ImageTooLarge { max: usize },

    #[error("image data is not a JPEG")]
    NotJpeg,

    #[error("unsupported content type {0:?}, expected image/jpeg")]
    UnsupportedMediaType(String),

    #[error("violation type is missing")]
    MissingViolationType,

    #[error("unknown violation type {0:?}, expected one of: smoke, spit")]
    InvalidViolationType(String),

    #[error("device id is missing")]
    MissingDeviceId,

    #[error("invalid timestamp {0:?}, expected RFC 3339")]
    InvalidTimestamp(String),

    #[error("invalid sensor data: {0}")]
    InvalidSensorData(String),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("invalid violation id {0:?}")]
    InvalidId(String),

    #[error("page must be greater than zero")]
    InvalidPage,

    #[error("limit must be between 1 and {max}")]
    InvalidLimit { max: u32 },
}

/// A lookup by id found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_top_level_error() {
        let err: CamGuardError = ValidationError::EmptyImage.into();
        assert!(matches!(
            err,
            CamGuardError::Validation(ValidationError::EmptyImage)
        ));
    }

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Violation",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Violation abc not found");
    }

    #[test]
    fn should_keep_storage_source_when_boxed() {
        let io = std::io::Error::other("disk gone");
        let err = CamGuardError::Storage(Box::new(io));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk gone");
    }
}

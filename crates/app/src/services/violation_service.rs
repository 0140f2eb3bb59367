//! Violation service — use-cases for recording and browsing violations.

use camguard_domain::error::{CamGuardError, NotFoundError};
use camguard_domain::id::ViolationId;
use camguard_domain::image::ImageData;
use camguard_domain::pagination::{Page, validate_limit};
use camguard_domain::violation::{SensorReadings, Violation, ViolationType};

use crate::ports::ViolationRepository;

/// Application service for the violation collection.
pub struct ViolationService<R> {
    repo: R,
}

impl<R: ViolationRepository> ViolationService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validate an uploaded image and its sensor document, then persist them.
    ///
    /// Nothing is written when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`CamGuardError::Validation`] if the image is empty, too large
    /// or not a JPEG, or if the sensor document is invalid; otherwise a
    /// storage error propagated from the repository.
    pub async fn record(
        &self,
        image: Vec<u8>,
        sensor_readings: SensorReadings,
    ) -> Result<Violation, CamGuardError> {
        let image_data = ImageData::new(image)?;
        let violation = Violation::builder()
            .image_data(image_data)
            .sensor_readings(sensor_readings)
            .build()?;

        let created = self.repo.create(violation).await?;
        tracing::info!(
            id = %created.id,
            violation_type = %created.violation_type(),
            device_id = %created.sensor_readings.device_id,
            size = created.image_data.len(),
            "violation recorded"
        );
        Ok(created)
    }

    /// List one page of violations, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_violations(&self, page: Page) -> Result<Vec<Violation>, CamGuardError> {
        self.repo.list(page).await
    }

    /// Total number of stored violations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_violations(&self) -> Result<u64, CamGuardError> {
        self.repo.count().await
    }

    /// Look up a violation by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`CamGuardError::NotFound`] when no violation with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_violation(&self, id: ViolationId) -> Result<Violation, CamGuardError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Fetch only the stored image of a violation.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_violation`].
    pub async fn get_image(&self, id: ViolationId) -> Result<ImageData, CamGuardError> {
        Ok(self.get_violation(id).await?.image_data)
    }

    /// The most recent violations, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CamGuardError::Validation`] if `limit` is out of bounds, or a
    /// storage error from the repository.
    pub async fn recent_violations(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Violation>, CamGuardError> {
        let limit = validate_limit(limit)?;
        self.repo.get_recent(limit).await
    }

    /// One page of violations of a single type, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn violations_by_type(
        &self,
        violation_type: ViolationType,
        page: Page,
    ) -> Result<Vec<Violation>, CamGuardError> {
        self.repo.find_by_type(violation_type, page).await
    }

    /// Delete a violation by id.
    ///
    /// # Errors
    ///
    /// Returns [`CamGuardError::NotFound`] when nothing was deleted, or a
    /// storage error from the repository.
    pub async fn delete_violation(&self, id: ViolationId) -> Result<(), CamGuardError> {
        if self.repo.delete(id).await? {
            tracing::info!(%id, "violation deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: ViolationId) -> CamGuardError {
    NotFoundError {
        entity: "Violation",
        id: id.to_string(),
    }
    .into()
}

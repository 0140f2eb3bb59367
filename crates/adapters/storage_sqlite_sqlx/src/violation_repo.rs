//! `SQLite` implementation of [`ViolationRepository`].
//!
//! The sensor document is stored as JSON so unknown readings survive the
//! round-trip; `violation_type` and `device_id` are copied into their own
//! columns for filtering.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use camguard_app::ports::ViolationRepository;
use camguard_domain::error::CamGuardError;
use camguard_domain::id::ViolationId;
use camguard_domain::image::ImageData;
use camguard_domain::pagination::Page;
use camguard_domain::time::{parse_rfc3339, to_sortable_string};
use camguard_domain::violation::{SensorReadings, Violation, ViolationType};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Violation);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Violation> {
        value.map(|w| w.0)
    }

    fn unwrap_all(rows: Vec<Self>) -> Vec<Violation> {
        rows.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let sensor_readings: String = row.try_get("sensor_readings")?;
        let image_data: Vec<u8> = row.try_get("image_data")?;
        let created_at: String = row.try_get("created_at")?;

        let sensor_readings: SensorReadings = serde_json::from_str(&sensor_readings)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let image_data =
            ImageData::new(image_data).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at =
            parse_rfc3339(&created_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Violation {
            id: ViolationId::from_uuid(id),
            image_data,
            sensor_readings,
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO violations (id, violation_type, device_id, sensor_readings, image_data, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM violations WHERE id = ?";

// rowid breaks ties between records inserted within the same microsecond.
const SELECT_PAGE: &str = r"
    SELECT * FROM violations
    ORDER BY created_at DESC, rowid DESC
    LIMIT ? OFFSET ?
";

const SELECT_PAGE_BY_TYPE: &str = r"
    SELECT * FROM violations
    WHERE violation_type = ?
    ORDER BY created_at DESC, rowid DESC
    LIMIT ? OFFSET ?
";

const COUNT_ALL: &str = "SELECT COUNT(*) FROM violations";
const DELETE_BY_ID: &str = "DELETE FROM violations WHERE id = ?";

/// `SQLite`-backed violation repository.
pub struct SqliteViolationRepository {
    pool: SqlitePool,
}

impl SqliteViolationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn limit_and_offset(page: Page) -> (i64, i64) {
    (
        i64::from(page.limit()),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

impl ViolationRepository for SqliteViolationRepository {
    async fn create(&self, violation: Violation) -> Result<Violation, CamGuardError> {
        let readings_json =
            serde_json::to_string(&violation.sensor_readings).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(violation.id.as_uuid())
            .bind(violation.violation_type().as_str())
            .bind(&violation.sensor_readings.device_id)
            .bind(&readings_json)
            .bind(violation.image_data.as_bytes())
            .bind(to_sortable_string(violation.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(violation)
    }

    async fn get_by_id(&self, id: ViolationId) -> Result<Option<Violation>, CamGuardError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn list(&self, page: Page) -> Result<Vec<Violation>, CamGuardError> {
        let (limit, offset) = limit_and_offset(page);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::unwrap_all(rows))
    }

    async fn count(&self) -> Result<u64, CamGuardError> {
        let count: i64 = sqlx::query_scalar(COUNT_ALL)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn get_recent(&self, limit: u32) -> Result<Vec<Violation>, CamGuardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE)
            .bind(i64::from(limit))
            .bind(0_i64)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::unwrap_all(rows))
    }

    async fn find_by_type(
        &self,
        violation_type: ViolationType,
        page: Page,
    ) -> Result<Vec<Violation>, CamGuardError> {
        let (limit, offset) = limit_and_offset(page);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PAGE_BY_TYPE)
            .bind(violation_type.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::unwrap_all(rows))
    }

    async fn delete(&self, id: ViolationId) -> Result<bool, CamGuardError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use camguard_domain::time::Timestamp;

    async fn setup() -> SqliteViolationRepository {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        SqliteViolationRepository::new(db.pool().clone())
    }

    fn jpeg(fill: u8, len: usize) -> ImageData {
        let mut bytes = vec![fill; len];
        bytes[0] = 0xFF;
        bytes[1] = 0xD8;
        ImageData::new(bytes).unwrap()
    }

    fn at(minute: u32) -> Timestamp {
        parse_rfc3339(&format!("2026-02-01T08:{minute:02}:00Z")).unwrap()
    }

    fn violation(kind: ViolationType, minute: u32) -> Violation {
        Violation::builder()
            .image_data(jpeg(0x11, 128))
            .sensor_readings(SensorReadings::new(kind, "cam1"))
            .created_at(at(minute))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_identical_violation() {
        let repo = setup().await;
        let mut extra = serde_json::Map::new();
        extra.insert("smokePpm".to_string(), serde_json::json!(731.5));
        let readings = SensorReadings::new(ViolationType::Smoke, "esp32-lobby")
            .with_captured_at(at(3))
            .with_extra(extra);
        let original = Violation::builder()
            .image_data(jpeg(0xAB, 4096))
            .sensor_readings(readings.clone())
            .build()
            .unwrap();
        let id = original.id;

        repo.create(original.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.image_data, original.image_data);
        assert_eq!(fetched.sensor_readings, readings);
        assert_eq!(fetched.created_at, original.created_at);
    }

    #[tokio::test]
    async fn should_return_none_when_violation_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(ViolationId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_newest_first_and_respect_page_bounds() {
        let repo = setup().await;
        for minute in [5, 1, 4, 2, 3] {
            repo.create(violation(ViolationType::Spit, minute))
                .await
                .unwrap();
        }

        let first = repo.list(Page::new(Some(1), Some(2)).unwrap()).await.unwrap();
        let last = repo.list(Page::new(Some(3), Some(2)).unwrap()).await.unwrap();
        let beyond = repo.list(Page::new(Some(4), Some(2)).unwrap()).await.unwrap();

        let minutes: Vec<_> = first.iter().map(|v| v.created_at).collect();
        assert_eq!(minutes, vec![at(5), at(4)]);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].created_at, at(1));
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn should_break_timestamp_ties_by_insertion_order() {
        let repo = setup().await;
        let older = violation(ViolationType::Smoke, 7);
        let newer = violation(ViolationType::Smoke, 7);
        let newer_id = newer.id;
        repo.create(older).await.unwrap();
        repo.create(newer).await.unwrap();

        let recent = repo.get_recent(1).await.unwrap();
        assert_eq!(recent[0].id, newer_id);
    }

    #[tokio::test]
    async fn should_count_all_violations() {
        let repo = setup().await;
        assert_eq!(repo.count().await.unwrap(), 0);
        repo.create(violation(ViolationType::Smoke, 1)).await.unwrap();
        repo.create(violation(ViolationType::Spit, 2)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn should_return_most_recent_within_limit() {
        let repo = setup().await;
        for minute in 0..6 {
            repo.create(violation(ViolationType::Smoke, minute))
                .await
                .unwrap();
        }

        let recent = repo.get_recent(3).await.unwrap();
        let minutes: Vec<_> = recent.iter().map(|v| v.created_at).collect();
        assert_eq!(minutes, vec![at(5), at(4), at(3)]);
    }

    #[tokio::test]
    async fn should_filter_by_type() {
        let repo = setup().await;
        repo.create(violation(ViolationType::Smoke, 1)).await.unwrap();
        repo.create(violation(ViolationType::Spit, 2)).await.unwrap();
        repo.create(violation(ViolationType::Smoke, 3)).await.unwrap();

        let smoke = repo
            .find_by_type(ViolationType::Smoke, Page::default())
            .await
            .unwrap();
        let spit = repo
            .find_by_type(ViolationType::Spit, Page::default())
            .await
            .unwrap();

        assert_eq!(smoke.len(), 2);
        assert!(smoke.iter().all(|v| v.violation_type() == ViolationType::Smoke));
        assert_eq!(smoke[0].created_at, at(3));
        assert_eq!(spit.len(), 1);
    }

    #[tokio::test]
    async fn should_page_type_filter_newest_first() {
        let repo = setup().await;
        for minute in [1, 2, 3, 4, 5] {
            let kind = if minute == 4 {
                ViolationType::Spit
            } else {
                ViolationType::Smoke
            };
            repo.create(violation(kind, minute)).await.unwrap();
        }

        let mut pages = Vec::new();
        for page in 1..=3 {
            let items = repo
                .find_by_type(ViolationType::Smoke, Page::new(Some(page), Some(1)).unwrap())
                .await
                .unwrap();
            pages.push(items.iter().map(|v| v.created_at).collect::<Vec<_>>());
        }
        let beyond = repo
            .find_by_type(ViolationType::Smoke, Page::new(Some(3), Some(2)).unwrap())
            .await
            .unwrap();

        assert_eq!(pages, vec![vec![at(5)], vec![at(3)], vec![at(2)]]);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn should_report_whether_delete_removed_a_record() {
        let repo = setup().await;
        let item = violation(ViolationType::Spit, 1);
        let id = item.id;
        repo.create(item).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(!repo.delete(id).await.unwrap());
    }
}

//! Pagination bounds shared by listing use-cases.

use crate::error::ValidationError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound on any page or "recent" window.
pub const MAX_LIMIT: u32 = 100;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Build a page from optional query values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPage`] when `page` is zero and
    /// [`ValidationError::InvalidLimit`] when `limit` is zero or above
    /// [`MAX_LIMIT`].
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, ValidationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }
        let limit = validate_limit(limit)?;
        Ok(Self { page, limit })
    }

    #[must_use]
    pub fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(self) -> u32 {
        self.limit
    }

    /// Number of records to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Apply the default and bounds to a bare limit (used by "recent").
///
/// # Errors
///
/// Returns [`ValidationError::InvalidLimit`] when `limit` is zero or above
/// [`MAX_LIMIT`].
pub fn validate_limit(limit: Option<u32>) -> Result<u32, ValidationError> {
    match limit.unwrap_or(DEFAULT_LIMIT) {
        0 => Err(ValidationError::InvalidLimit { max: MAX_LIMIT }),
        n if n > MAX_LIMIT => Err(ValidationError::InvalidLimit { max: MAX_LIMIT }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_first_page_of_ten() {
        let page = Page::new(None, None).unwrap();
        assert_eq!(page, Page::default());
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn should_compute_offset_from_page_and_limit() {
        let page = Page::new(Some(3), Some(20)).unwrap();
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn should_reject_page_zero() {
        assert_eq!(Page::new(Some(0), None), Err(ValidationError::InvalidPage));
    }

    #[test]
    fn should_reject_limit_zero_and_above_max() {
        assert!(Page::new(None, Some(0)).is_err());
        assert!(Page::new(None, Some(MAX_LIMIT + 1)).is_err());
        assert!(Page::new(None, Some(MAX_LIMIT)).is_ok());
    }

    #[test]
    fn should_not_overflow_offset_for_large_pages() {
        let page = Page::new(Some(u32::MAX), Some(MAX_LIMIT)).unwrap();
        assert_eq!(page.offset(), u64::from(u32::MAX - 1) * 100);
    }
}

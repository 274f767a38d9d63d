//! Page size policy and the generic page envelope.

use thiserror::Error;

/// Page size used when the server configuration does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page a server may be configured to serve.
pub const MAX_PAGE_SIZE: usize = 100;

/// Errors raised when constructing a [`PageSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageSizeError {
    /// A page must hold at least one record.
    #[error("page size must be at least 1")]
    Zero,

    /// The requested size is above [`MAX_PAGE_SIZE`].
    #[error("page size {requested} exceeds the maximum of {max}")]
    TooLarge {
        /// Requested page size.
        requested: usize,
        /// Maximum permitted page size.
        max: usize,
    },
}

/// Number of records served per page, bounded to `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    /// Validate and wrap a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError`] when `value` is zero or above
    /// [`MAX_PAGE_SIZE`].
    pub const fn new(value: usize) -> Result<Self, PageSizeError> {
        if value == 0 {
            return Err(PageSizeError::Zero);
        }
        if value > MAX_PAGE_SIZE {
            return Err(PageSizeError::TooLarge {
                requested: value,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self(value))
    }

    /// Number of records on a full page.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of rows to fetch so the caller can detect a following page
    /// without a second query.
    #[must_use]
    pub const fn fetch_limit(self) -> usize {
        self.0.saturating_add(1)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

/// Truncate rows fetched with [`PageSize::fetch_limit`] to one page.
///
/// Returns `true` when the look-ahead row existed, meaning more records
/// follow this page.
pub fn trim_to_page<T>(rows: &mut Vec<T>, size: PageSize) -> bool {
    let has_more = rows.len() > size.get();
    rows.truncate(size.get());
    has_more
}

/// One page of items and the token for the following page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    /// Items in list order.
    pub items: Vec<T>,
    /// Opaque token for the next page, absent on the last page.
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1)]
    #[case(DEFAULT_PAGE_SIZE)]
    #[case(MAX_PAGE_SIZE)]
    fn accepts_sizes_in_range(#[case] value: usize) {
        let size = PageSize::new(value).expect("valid size");
        assert_eq!(size.get(), value);
        assert_eq!(size.fetch_limit(), value + 1);
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(PageSize::new(0), Err(PageSizeError::Zero));
    }

    #[test]
    fn rejects_oversized_pages() {
        assert_eq!(
            PageSize::new(MAX_PAGE_SIZE + 1),
            Err(PageSizeError::TooLarge {
                requested: MAX_PAGE_SIZE + 1,
                max: MAX_PAGE_SIZE,
            })
        );
    }

    #[test]
    fn default_is_twenty() {
        assert_eq!(PageSize::default().get(), 20);
    }

    #[rstest]
    #[case(vec![1, 2, 3, 4], 3, vec![1, 2, 3], true)]
    #[case(vec![1, 2, 3], 3, vec![1, 2, 3], false)]
    #[case(vec![1], 3, vec![1], false)]
    #[case(vec![], 3, vec![], false)]
    fn trim_reports_look_ahead_row(
        #[case] mut rows: Vec<u8>,
        #[case] size: usize,
        #[case] expected: Vec<u8>,
        #[case] expected_more: bool,
    ) {
        let size = PageSize::new(size).expect("valid size");
        let has_more = trim_to_page(&mut rows, size);

        assert_eq!(rows, expected);
        assert_eq!(has_more, expected_more);
    }
}

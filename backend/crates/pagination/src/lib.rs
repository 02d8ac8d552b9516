//! Page-number pagination primitives.
//!
//! A [`PageRequest`] selects a 1-indexed window over an ordered result set and
//! a [`Page`] carries that window together with the total row count, so
//! adapters can render `current_page`, `per_page`, `total`, and `last_page`
//! metadata without re-querying storage.
//!
//! Requesting a page beyond the end of the result set is not an error: the
//! resulting page is simply empty.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// Page size outside `1..=MAX_PER_PAGE`.
    #[error("per_page must be between 1 and {max}")]
    PerPageOutOfRange {
        /// Upper bound accepted for the page size.
        max: u32,
    },
}

/// A validated, 1-indexed page window.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 2).expect("valid window");
/// assert_eq!(request.offset(), 4);
/// assert_eq!(request.limit(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request, rejecting a zero page or an out-of-range page size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` lies
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query parameters, applying defaults.
    ///
    /// # Errors
    /// Propagates the validation performed by [`PageRequest::new`].
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    /// The 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Alias of [`PageRequest::per_page`] for query builders.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.per_page
    }

    /// Select this page's window from an already ordered slice.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let items = [1, 2, 3, 4, 5];
    /// let request = PageRequest::new(3, 2).expect("valid window");
    /// assert_eq!(request.window(&items), vec![5]);
    /// ```
    #[must_use]
    pub fn window<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        items.iter().skip(skip).take(take).cloned().collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Serialisable pagination metadata for a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page number that was served.
    pub current_page: u32,
    /// Page size that was applied.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Number of the last non-empty page; `1` for an empty result set.
    pub last_page: u32,
}

/// A window of results plus the total count of the underlying result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    request: PageRequest,
    total: u64,
}

impl<T> Page<T> {
    /// Assemble a page from its items and the total row count.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            request,
            total,
        }
    }

    /// Items on this page, in result order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The window this page was produced for.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Metadata describing this page's position in the result set.
    #[must_use]
    pub fn meta(&self) -> PageMeta {
        let pages = self.total.div_ceil(u64::from(self.request.per_page)).max(1);
        PageMeta {
            current_page: self.request.page,
            per_page: self.request.per_page,
            total: self.total,
            last_page: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// Transform every item while keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            request: self.request,
            total: self.total,
        }
    }
}

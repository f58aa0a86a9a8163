//! Resolve requested page numbers against a total item count.

use std::num::{IntErrorKind, NonZeroUsize};

use thiserror::Error;

use crate::page::{Page, PageWindow};

/// Errors returned by strict page lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The requested value is not an integer.
    #[error("page number is not an integer: {raw}")]
    NotAnInteger {
        /// Raw value supplied by the caller.
        raw: String,
    },
    /// The requested page lies outside `1..=last`.
    #[error("page {requested} is out of range (last page is {last})")]
    OutOfRange {
        /// Requested page number.
        requested: i64,
        /// Highest valid page number.
        last: usize,
    },
}

/// Splits `count` items into pages of `per_page` items.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use pagination::Paginator;
///
/// let paginator = Paginator::new(0, NonZeroUsize::MIN);
/// assert_eq!(paginator.num_pages(), 1);
/// assert!(paginator.page(1).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: usize,
    per_page: NonZeroUsize,
}

impl Paginator {
    /// Create a paginator over `count` items.
    #[must_use]
    pub const fn new(count: usize, per_page: NonZeroUsize) -> Self {
        Self { count, per_page }
    }

    /// Total number of items being paginated.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of items on a single page.
    #[must_use]
    pub const fn per_page(&self) -> NonZeroUsize {
        self.per_page
    }

    /// Number of pages; never less than one.
    #[must_use]
    pub const fn num_pages(&self) -> usize {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page.get())
        }
    }

    /// Look up a page strictly, rejecting numbers outside `1..=num_pages`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] when `number` is below one or past
    /// the last page.
    pub fn page(&self, number: i64) -> Result<PageWindow, PageError> {
        let last = self.num_pages();
        match usize::try_from(number) {
            Ok(valid) if (1..=last).contains(&valid) => Ok(self.window(valid)),
            _ => Err(PageError::OutOfRange {
                requested: number,
                last,
            }),
        }
    }

    /// Parse a raw page parameter strictly.
    ///
    /// Surrounding whitespace is ignored. Integers too large for `i64` are
    /// still integers and saturate, so they count as out of range.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotAnInteger`] for non-numeric input and
    /// [`PageError::OutOfRange`] for numbers outside the valid range.
    pub fn parse_page(&self, raw: &str) -> Result<PageWindow, PageError> {
        let number = match raw.trim().parse::<i64>() {
            Ok(number) => number,
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => {
                    return Err(PageError::NotAnInteger {
                        raw: raw.to_owned(),
                    });
                }
            },
        };
        self.page(number)
    }

    /// Resolve a raw page parameter leniently.
    ///
    /// Missing or non-numeric input yields the first page; numbers outside
    /// the valid range yield the last page.
    #[must_use]
    pub fn resolve(&self, raw: Option<&str>) -> PageWindow {
        let Some(raw) = raw else {
            return self.window(1);
        };
        match self.parse_page(raw) {
            Ok(window) => window,
            Err(PageError::NotAnInteger { .. }) => self.window(1),
            Err(PageError::OutOfRange { last, .. }) => self.window(last),
        }
    }

    /// Resolve `raw` leniently and take the matching slice of `items`.
    ///
    /// `items` must hold exactly [`Paginator::count`] entries in display
    /// order.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>, raw: Option<&str>) -> Page<T> {
        let window = self.resolve(raw);
        let selected = items
            .into_iter()
            .skip(window.offset())
            .take(self.per_page.get())
            .collect();
        Page::new(selected, window)
    }

    fn window(&self, number: usize) -> PageWindow {
        PageWindow::new(number, self.num_pages(), self.count, self.per_page)
    }
}

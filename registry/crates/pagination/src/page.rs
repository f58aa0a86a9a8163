//! A resolved page and the items it holds.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Position and bounds of one page within a paginated sequence.
///
/// ## Invariants
/// - `1 <= number <= num_pages`.
/// - `num_pages >= 1`, even when `count` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    number: usize,
    num_pages: usize,
    count: usize,
    per_page: NonZeroUsize,
}

impl PageWindow {
    pub(crate) const fn new(
        number: usize,
        num_pages: usize,
        count: usize,
        per_page: NonZeroUsize,
    ) -> Self {
        Self {
            number,
            num_pages,
            count,
            per_page,
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Total number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Page size used to build this window.
    #[must_use]
    pub const fn per_page(&self) -> NonZeroUsize {
        self.per_page
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.number
            .saturating_sub(1)
            .saturating_mul(self.per_page.get())
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<usize> {
        if self.has_next() {
            Some(self.number + 1)
        } else {
            None
        }
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<usize> {
        if self.has_previous() {
            Some(self.number - 1)
        } else {
            None
        }
    }

    /// 1-based index of the first item on this page, or zero when empty.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// 1-based index of the last item on this page, or zero when empty.
    #[must_use]
    pub fn end_index(&self) -> usize {
        if self.number == self.num_pages {
            self.count
        } else {
            self.offset() + self.per_page.get()
        }
    }
}

/// Items that fall inside a [`PageWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    #[serde(flatten)]
    window: PageWindow,
}

impl<T> Page<T> {
    /// Pair the selected items with their window.
    #[must_use]
    pub const fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    /// Items on this page in display order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Window describing where this page sits.
    #[must_use]
    pub const fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

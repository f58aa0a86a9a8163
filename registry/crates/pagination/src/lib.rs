//! Page-number pagination primitives shared by registry list views.
//!
//! The crate splits pagination into three pieces:
//!
//! - [`Paginator`] knows the total item count and page size and resolves a
//!   requested page number into a [`PageWindow`].
//! - [`PageWindow`] describes one page: its number, bounds, and neighbours.
//! - [`Page`] pairs a window with the items that fall inside it.
//!
//! Page numbers are 1-based. A paginator over zero items still exposes one
//! (empty) page so list views can always render a first page.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use pagination::Paginator;
//!
//! let per_page = NonZeroUsize::new(10).expect("non-zero");
//! let paginator = Paginator::new(42, per_page);
//! assert_eq!(paginator.num_pages(), 5);
//!
//! // Requests past the end clamp to the last page.
//! let window = paginator.resolve(Some("9"));
//! assert_eq!(window.number(), 5);
//! assert_eq!(window.start_index(), 41);
//! assert_eq!(window.end_index(), 42);
//! ```

mod links;
mod page;
mod paginator;

pub use links::query_with_page;
pub use page::{Page, PageWindow};
pub use paginator::{PageError, Paginator};

//! List view inputs and outputs: request normalisation, the page of
//! students and enrollment analytics.

use std::num::NonZeroUsize;

use chrono::{Datelike, NaiveDate};
use pagination::Page;
use serde::Serialize;
use serde_json::{Value, json};

use super::{Student, StudentFilter};

/// Page sizes offered by the list view.
pub const PAGE_SIZE_OPTIONS: [usize; 6] = [1, 5, 10, 15, 20, 25];

/// Page size used when the requested one is not offered.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => panic!("default page size must be non-zero"),
};

/// Calendar month names used as chart labels.
pub const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Normalised list view query.
///
/// Construction never fails: unusable values fall back to permissive
/// defaults instead of producing an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    search: String,
    year: Option<i32>,
    page_size: NonZeroUsize,
    page: Option<String>,
}

impl ListingRequest {
    /// Normalise raw query-string values.
    ///
    /// - `q` is taken as typed; only an empty value means no search.
    /// - `selected_year` that does not parse as an integer means all years.
    /// - `records_per_page` outside [`PAGE_SIZE_OPTIONS`] becomes
    ///   [`DEFAULT_PAGE_SIZE`].
    /// - `page` is kept raw; the paginator resolves it against the result.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::ListingRequest;
    ///
    /// let request = ListingRequest::from_raw(Some("ann"), Some("foo"), Some("7"), None);
    /// assert_eq!(request.search(), "ann");
    /// assert_eq!(request.year(), None);
    /// assert_eq!(request.page_size().get(), 10);
    /// ```
    pub fn from_raw(
        q: Option<&str>,
        selected_year: Option<&str>,
        records_per_page: Option<&str>,
        page: Option<&str>,
    ) -> Self {
        let year = selected_year.and_then(|raw| raw.trim().parse::<i32>().ok());
        let page_size = records_per_page
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|size| PAGE_SIZE_OPTIONS.contains(size))
            .and_then(NonZeroUsize::new)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            search: q.unwrap_or_default().to_owned(),
            year,
            page_size,
            page: page.map(str::to_owned),
        }
    }

    /// Search text as typed; empty when not searching.
    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    /// Selected enrollment year.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Resolved page size.
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Raw requested page number.
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// Filter selecting the listed records (search and year).
    pub fn filter(&self) -> StudentFilter {
        StudentFilter::all()
            .with_search(&self.search)
            .with_enrollment_year(self.year)
    }
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self::from_raw(None, None, None, None)
    }
}

/// Enrollment counts for the chart panel.
///
/// ## Invariants
/// - `period_counts` and `monthly_counts` each sum to the number of dates
///   aggregated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentAnalytics {
    period_counts: [usize; 3],
    monthly_counts: [usize; 12],
}

impl EnrollmentAnalytics {
    /// Aggregate enrollment dates into periods and months.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use registry::domain::EnrollmentAnalytics;
    ///
    /// let dates = ["2023-01-10", "2023-06-15", "2023-11-01"]
    ///     .map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date"));
    /// let analytics = EnrollmentAnalytics::from_dates(dates);
    /// assert_eq!(analytics.period_counts(), [1, 1, 1]);
    /// ```
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        dates.into_iter().fold(Self::default(), |mut acc, date| {
            let month = date.month0() as usize;
            acc.monthly_counts[month] += 1;
            acc.period_counts[month / 4] += 1;
            acc
        })
    }

    /// Counts for January-April, May-August and September-December.
    pub fn period_counts(&self) -> [usize; 3] {
        self.period_counts
    }

    /// Counts per calendar month, January first.
    pub fn monthly_counts(&self) -> [usize; 12] {
        self.monthly_counts
    }

    /// Number of dates aggregated.
    pub fn total(&self) -> usize {
        self.monthly_counts.iter().sum()
    }

    /// Data consumed by the list page's charts.
    pub fn chart_payload(&self) -> Value {
        json!({
            "pieChartData": self.period_counts,
            "graphLabels": MONTH_LABELS,
            "graphData": self.monthly_counts,
        })
    }
}

/// Everything the list page displays.
#[derive(Debug, Clone)]
pub struct StudentListing {
    /// Students on the requested page.
    pub page: Page<Student>,
    /// Echo of the normalised request.
    pub request: ListingRequest,
    /// Distinct enrollment years across the whole store, ascending.
    pub available_years: Vec<i32>,
    /// Counts over the year-filtered records.
    pub analytics: EnrollmentAnalytics,
}

//! Listing filter shared by the record store adapters.

use super::Student;

/// Search text and enrollment year restrictions for a listing query.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    search: Option<String>,
    enrollment_year: Option<i32>,
}

impl StudentFilter {
    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to names containing `text`, ignoring case.
    ///
    /// Empty text leaves the filter unrestricted. Whitespace is kept, so
    /// `" "` only matches names that contain a space.
    pub fn with_search(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        self.search = (!text.is_empty()).then(|| text.to_owned());
        self
    }

    /// Restrict to records enrolled during `year`.
    pub fn with_enrollment_year(mut self, year: Option<i32>) -> Self {
        self.enrollment_year = year;
        self
    }

    /// Search text, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Enrollment year, if any.
    pub fn enrollment_year(&self) -> Option<i32> {
        self.enrollment_year
    }

    /// Copy of this filter without the search text.
    pub fn without_search(&self) -> Self {
        Self {
            search: None,
            enrollment_year: self.enrollment_year,
        }
    }

    /// Whether `student` satisfies both restrictions.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::StudentFilter;
    ///
    /// let filter = StudentFilter::all().with_search("");
    /// assert!(filter.search().is_none());
    /// ```
    pub fn matches(&self, student: &Student) -> bool {
        let year_ok = self
            .enrollment_year
            .is_none_or(|year| student.enrollment_year() == year);
        let search_ok = self.search.as_deref().is_none_or(|text| {
            let needle = text.to_lowercase();
            student.first_name().as_str().to_lowercase().contains(&needle)
                || student.last_name().as_str().to_lowercase().contains(&needle)
        });
        year_ok && search_ok
    }
}

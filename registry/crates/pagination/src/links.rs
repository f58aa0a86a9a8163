//! Build page links that keep the rest of the query string intact.

use url::form_urlencoded;

/// Rewrite a query string so its `page` parameter points at `page`.
///
/// Every other parameter is preserved in its original order; any existing
/// `page` parameters are dropped and a single one is appended. The result
/// starts with `?` so it can be used directly as a relative link.
///
/// # Examples
///
/// ```
/// use pagination::query_with_page;
///
/// let link = query_with_page("q=ann&page=1&records_per_page=5", 2);
/// assert_eq!(link, "?q=ann&records_per_page=5&page=2");
/// ```
#[must_use]
pub fn query_with_page(query: &str, page: usize) -> String {
    // The leading `?` is a prefix, not an already-encoded pair.
    let mut serializer = form_urlencoded::Serializer::for_suffix(String::from("?"), 1);
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        if key != "page" {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.append_pair("page", &page.to_string());
    serializer.finish()
}

#[cfg(test)]
mod tests {
    //! Query rewriting cases.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 1, "?page=1")]
    #[case("?page=4", 3, "?page=3")]
    #[case("selected_year=2023&page=1&page=2", 5, "?selected_year=2023&page=5")]
    #[case("q=mary+ann", 2, "?q=mary+ann&page=2")]
    #[case("?page=9&q=ann", 1, "?q=ann&page=1")]
    fn rewrites_page_parameter(#[case] query: &str, #[case] page: usize, #[case] expected: &str) {
        let link = query_with_page(query, page);
        assert!(!link.starts_with("?&"), "no empty leading pair in {link}");
        assert_eq!(link, expected);
    }
}

//! Pagination for the employee listing
//!
//! Fixed page size of 3. Pages past the end are not clamped: they produce an
//! empty slice.

/// Rows shown per listing page
pub const PER_PAGE: i64 = 3;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        PER_PAGE
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Pages below 1 are treated as page 1.
///
/// # Examples
/// ```
/// use empdir_web::pagination::calculate_pagination;
///
/// // 4 rows = 2 pages (3 + 1)
/// let p = calculate_pagination(4, 2);
/// assert_eq!(p.total_pages, 2);
/// assert_eq!(p.offset, 3);
///
/// // Past the end: empty page, not an error
/// let p = calculate_pagination(4, 9);
/// assert_eq!(p.page, 9);
/// assert_eq!(p.offset, 24);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64) -> Pagination {
    let total_pages = (total_results.max(0) + PER_PAGE - 1) / PER_PAGE;
    let page = requested_page.max(1);
    let offset = (page - 1).saturating_mul(PER_PAGE);

    Pagination {
        page,
        total_pages,
        offset,
    }
}

/// Parse the `page` query value; anything that is not an integer means page 1
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_four_rows_two_pages() {
        let p = calculate_pagination(4, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 0);
        assert!(!p.has_prev());
        assert!(p.has_next());

        let p = calculate_pagination(4, 2);
        assert_eq!(p.offset, 3);
        assert!(p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(6, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 3);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(5, 99);
        assert_eq!(p.page, 99); // Not clamped
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(5, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);

        let p = calculate_pagination(5, -4);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_huge_page_does_not_overflow() {
        let p = calculate_pagination(5, i64::MAX);
        assert_eq!(p.offset, i64::MAX);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("2")), 2);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
    }
}

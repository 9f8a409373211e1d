//! Offset pagination helpers shared by all list endpoints.
//!
//! Repositories fetch `per_page + 1` rows; the extra row only signals that a
//! further page exists and is dropped from the rendered window.

use serde::Deserialize;

/// `?page=N` query parameter accepted by every list endpoint
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    /// Page number clamped to >= 1, defaulting to 1
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One window of a paginated result set
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Build a page from `per_page + 1` fetched rows.
    pub fn from_rows(mut rows: Vec<T>, number: i64, per_page: i64) -> Self {
        let has_next = rows.len() as i64 > per_page;
        if has_next {
            rows.truncate(per_page as usize);
        }
        Page {
            items: rows,
            number,
            has_next,
            has_prev: number > 1,
        }
    }

    pub fn next_number(&self) -> Option<i64> {
        self.has_next.then_some(self.number + 1)
    }

    pub fn prev_number(&self) -> Option<i64> {
        self.has_prev.then_some(self.number - 1)
    }

    /// SQL OFFSET for a page number. Saturates instead of overflowing, so
    /// an absurd `?page=` value yields an empty window rather than a panic.
    pub fn offset(number: i64, per_page: i64) -> i64 {
        (number.max(1) - 1).saturating_mul(per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults_to_one() {
        assert_eq!(PageQuery { page: None }.number(), 1);
        assert_eq!(PageQuery { page: Some(0) }.number(), 1);
        assert_eq!(PageQuery { page: Some(-3) }.number(), 1);
        assert_eq!(PageQuery { page: Some(7) }.number(), 7);
    }

    #[test]
    fn test_first_page_with_more_rows() {
        let rows: Vec<i32> = (1..=11).collect();
        let page = Page::from_rows(rows, 1, 10);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert!(page.has_next);
        assert!(!page.has_prev);
        assert_eq!(page.next_number(), Some(2));
        assert_eq!(page.prev_number(), None);
    }

    #[test]
    fn test_last_page_exact_fit() {
        let rows: Vec<i32> = (21..=30).collect();
        let page = Page::from_rows(rows, 3, 10);
        assert_eq!(page.items.len(), 10);
        assert!(!page.has_next);
        assert!(page.has_prev);
        assert_eq!(page.next_number(), None);
        assert_eq!(page.prev_number(), Some(2));
    }

    #[test]
    fn test_empty_page() {
        let page: Page<i32> = Page::from_rows(vec![], 1, 10);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Page::<i32>::offset(1, 10), 0);
        assert_eq!(Page::<i32>::offset(3, 10), 20);
        assert_eq!(Page::<i32>::offset(0, 10), 0);
    }

    #[test]
    fn test_offset_saturates_on_huge_page_number() {
        let offset = Page::<i32>::offset(i64::MAX, 10);
        assert_eq!(offset, i64::MAX);
        assert!(Page::<i32>::offset(i64::MAX / 2, 1000) > 0);
    }
}

//! Pagination window behavior across a multi-page result set, driven the
//! same way the handlers drive it: fetch `per_page + 1` rows at an offset,
//! then build the page window.

use murmur_service::pagination::{Page, PageQuery};
use murmur_service::views::page_links;

/// Emulates a repository LIMIT/OFFSET fetch over a fixed result set
fn fetch_page(rows: &[i32], number: i64, per_page: i64) -> Page<i32> {
    let offset = Page::<i32>::offset(number, per_page) as usize;
    let window: Vec<i32> = rows
        .iter()
        .skip(offset)
        .take(per_page as usize + 1)
        .copied()
        .collect();
    Page::from_rows(window, number, per_page)
}

#[test]
fn thirty_posts_page_one() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, 1, 10);

    assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
    assert!(page.has_next);
    assert!(!page.has_prev);
    assert_eq!(page.next_number(), Some(2));
    assert_eq!(page.prev_number(), None);
}

#[test]
fn thirty_posts_page_two_has_both_links() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, 2, 10);

    assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
    assert!(page.has_next);
    assert!(page.has_prev);
}

#[test]
fn thirty_posts_page_three_is_last() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, 3, 10);

    assert_eq!(page.items, (21..=30).collect::<Vec<_>>());
    assert!(!page.has_next);
    assert!(page.has_prev);
    assert_eq!(page.next_number(), None);
    assert_eq!(page.prev_number(), Some(2));
}

#[test]
fn page_past_the_end_is_empty() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, 4, 10);

    assert!(page.items.is_empty());
    assert!(!page.has_next);
    assert!(page.has_prev);
}

#[test]
fn partial_last_page() {
    let rows: Vec<i32> = (1..=25).collect();
    let page = fetch_page(&rows, 3, 10);

    assert_eq!(page.items, (21..=25).collect::<Vec<_>>());
    assert!(!page.has_next);
}

#[test]
fn huge_page_number_is_safe_and_empty() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, i64::MAX, 10);

    assert!(page.items.is_empty());
    assert!(!page.has_next);
    assert!(page.has_prev);
}

#[test]
fn page_query_clamps_to_one() {
    for raw in [None, Some(0), Some(-5)] {
        assert_eq!(PageQuery { page: raw }.number(), 1);
    }
}

#[test]
fn search_links_stay_on_the_search_route() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, 2, 10);

    let (next, prev) = page_links("/search?q=hello", &page);
    assert_eq!(next.unwrap(), "/search?q=hello&page=3");
    assert_eq!(prev.unwrap(), "/search?q=hello&page=1");
}

#[test]
fn plain_route_links_use_question_mark() {
    let rows: Vec<i32> = (1..=30).collect();
    let page = fetch_page(&rows, 1, 10);

    let (next, prev) = page_links("/explore", &page);
    assert_eq!(next.unwrap(), "/explore?page=2");
    assert!(prev.is_none());
}

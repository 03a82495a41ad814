//! Translation of offset windows into GitHub `page`/`per_page` requests.
//!
//! GitHub pages are 1-based and at most 100 entries long. A window
//! `[offset, offset + count)` is covered with pages of `per_page = count`
//! (clamped to the API maximum), reading the covering pages and slicing.

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: usize = 100;

/// One page request and the slice of it that belongs to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Page size sent to the API.
    pub per_page: usize,
    /// Entries to drop from the start of the page.
    pub skip: usize,
    /// Entries to keep after skipping.
    pub take: usize,
}

/// Plans the page requests needed to read `count` entries starting at `offset`.
///
/// Returns an empty plan when `count` is zero.
///
/// # Example
///
/// ```
/// use gitql_api::pagination::{plan_window, PageRequest};
///
/// let plan = plan_window(30, 30);
/// assert_eq!(plan, vec![PageRequest { page: 2, per_page: 30, skip: 0, take: 30 }]);
/// ```
pub fn plan_window(offset: usize, count: usize) -> Vec<PageRequest> {
    let per_page = count.clamp(1, MAX_PER_PAGE);
    let end = offset.saturating_add(count);
    let mut requests = Vec::new();
    let mut position = offset;

    while position < end {
        let skip = position % per_page;
        let take = (per_page - skip).min(end - position);
        requests.push(PageRequest {
            page: position / per_page + 1,
            per_page,
            skip,
            take,
        });
        position += take;
    }

    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_first_page() {
        assert_eq!(
            plan_window(0, 100),
            vec![PageRequest {
                page: 1,
                per_page: 100,
                skip: 0,
                take: 100
            }]
        );
    }

    #[test]
    fn test_plan_aligned_offset() {
        assert_eq!(
            plan_window(200, 100),
            vec![PageRequest {
                page: 3,
                per_page: 100,
                skip: 0,
                take: 100
            }]
        );
    }

    #[test]
    fn test_plan_unaligned_offset_spans_two_pages() {
        assert_eq!(
            plan_window(7, 5),
            vec![
                PageRequest {
                    page: 2,
                    per_page: 5,
                    skip: 2,
                    take: 3
                },
                PageRequest {
                    page: 3,
                    per_page: 5,
                    skip: 0,
                    take: 2
                },
            ]
        );
    }

    #[test]
    fn test_plan_large_count_is_split_at_api_maximum() {
        let plan = plan_window(0, 250);
        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|r| r.per_page == MAX_PER_PAGE));
        assert_eq!(plan.iter().map(|r| r.take).sum::<usize>(), 250);
        assert_eq!(plan[2].page, 3);
        assert_eq!(plan[2].take, 50);
    }

    #[test]
    fn test_plan_zero_count_is_empty() {
        assert!(plan_window(10, 0).is_empty());
    }
}

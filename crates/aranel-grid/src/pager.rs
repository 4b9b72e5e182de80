//! Page windows over a filtered, sorted sequence.

use crate::options::{LoadResult, ALL_PAGES};

/// Cuts one page out of `records`.
///
/// - `page_number == -1` returns every record as a single page.
/// - Otherwise `total_pages` is `ceil(total / page_size)`, which is `0` for an
///   empty sequence. A page past the end is empty but keeps the counts.
/// - A `page_size` of zero or less yields no pages and no items.
/// - Any other `page_number` below `1` is read as page `1`.
///
/// # Example
///
/// ```
/// use aranel_grid::paginate;
///
/// let page = paginate((1..=12).collect(), 3, 5);
/// assert_eq!(page.total_items, 12);
/// assert_eq!(page.total_pages, 3);
/// assert_eq!(page.items, vec![11, 12]);
/// ```
pub fn paginate<R>(records: Vec<R>, page_number: i32, page_size: i32) -> LoadResult<R> {
    let total_items = records.len();

    if page_number == ALL_PAGES {
        return LoadResult {
            total_items,
            total_pages: 1,
            items: records,
        };
    }

    let Ok(size) = usize::try_from(page_size) else {
        return empty(total_items, 0);
    };
    if size == 0 {
        return empty(total_items, 0);
    }

    let total_pages = total_items.div_ceil(size);
    let page = usize::try_from(page_number.max(1)).unwrap_or(1);

    let start = (page - 1).checked_mul(size).unwrap_or(usize::MAX);
    if start >= total_items {
        return empty(total_items, total_pages);
    }

    let items = records.into_iter().skip(start).take(size).collect();
    LoadResult {
        total_items,
        total_pages,
        items,
    }
}

fn empty<R>(total_items: usize, total_pages: usize) -> LoadResult<R> {
    LoadResult {
        total_items,
        total_pages,
        items: Vec::new(),
    }
}

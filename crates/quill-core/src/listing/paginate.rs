//! Slicing ranked sequences into fixed-size pages.
//!
//! Out-of-range requests are clamped rather than rejected: a page below 1 or
//! an unparsable page number is page 1, and anything past the end is the
//! last page.

use std::num::{IntErrorKind, NonZeroUsize};

pub const DEFAULT_PER_PAGE: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// One page of a larger sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually served, after clamping. Always >= 1.
    pub number: usize,
    pub num_pages: usize,
    pub total_count: usize,
}

/// Parse `PerPages`. Missing, malformed, zero or negative values use the default.
pub fn parse_per_page(value: Option<&str>) -> NonZeroUsize {
    value
        .and_then(|v| v.trim().parse::<NonZeroUsize>().ok())
        .unwrap_or(DEFAULT_PER_PAGE)
}

/// Parse `PageNum`. Malformed input means page 1; a number too large to
/// represent still means "past the end".
pub fn parse_page_number(value: Option<&str>) -> i64 {
    match value.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        _ => 1,
    }
}

/// Slice `items` into the requested page.
pub fn paginate<T>(items: Vec<T>, per_page: NonZeroUsize, requested: i64) -> Page<T> {
    let per_page = per_page.get();
    let total_count = items.len();
    let num_pages = total_count.div_ceil(per_page);

    let last = num_pages.max(1);
    let number = if requested < 1 {
        1
    } else {
        usize::try_from(requested).map_or(last, |n| n.min(last))
    };

    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        number,
        num_pages,
        total_count,
    }
}

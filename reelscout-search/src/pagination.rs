//! Page arithmetic for catalog results.

/// Items per catalog page. Fixed by the catalog, not configurable.
pub const PAGE_SIZE: u32 = 10;

/// Number of pages needed for `total_count` matches, never less than one.
pub fn total_pages(total_count: u32) -> u32 {
    total_count.div_ceil(PAGE_SIZE).max(1)
}

/// 1-based position of the first item shown on `page`.
pub fn first_item_number(page: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(PAGE_SIZE).saturating_add(1)
}

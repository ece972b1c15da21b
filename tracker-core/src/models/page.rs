use serde::{Deserialize, Serialize};

use super::TaskRow;

/// Fixed number of tasks returned per listing page.
pub const PAGE_SIZE: u32 = 10;

/// One page of annotated tasks plus the exact match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskRow>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
}

/// Whether another page follows `page` given `total` matches.
///
/// Computed as `floor(total / PAGE_SIZE) > page`. At exact multiples of the
/// page size this reports one trailing page that turns out empty.
pub fn has_next_page(total: u64, page: u32) -> bool {
    total / u64::from(PAGE_SIZE) > u64::from(page)
}

/// Row offset of a zero-based page.
pub fn page_offset(page: u32) -> u64 {
    u64::from(page) * u64::from(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_next_page_for_twenty_five_rows() {
        assert!(has_next_page(25, 0));
        assert!(has_next_page(25, 1));
        assert!(!has_next_page(25, 2));
        assert!(!has_next_page(25, 7));
    }

    #[test]
    fn has_next_page_for_small_totals() {
        assert!(!has_next_page(0, 0));
        assert!(!has_next_page(9, 0));
        assert!(has_next_page(10, 0));
    }

    #[test]
    fn offset_scales_with_page_size() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(3), 30);
    }
}

use serde::{Deserialize, Serialize};

/// Smallest page size the history pager will use
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Largest page size the history pager will serve
pub const MAX_PAGE_SIZE: i64 = 50;

/// A requested page of results (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_num: i64,
    pub page_size: i64,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::first()
    }
}

impl PageInfo {
    pub fn new(page_num: i64, page_size: i64) -> Self {
        Self { page_num, page_size }
    }

    /// First page at the default size
    pub fn first() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }

    /// Requested page, never below page 1
    pub fn page(&self) -> i64 {
        self.page_num.max(1)
    }

    /// Page size, clamped to `DEFAULT_PAGE_SIZE..=MAX_PAGE_SIZE`
    pub fn size(&self) -> i64 {
        self.page_size.clamp(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Rows to skip. Saturates for absurd page numbers, which then read
    /// past the end and come back empty.
    pub fn offset(&self) -> i64 {
        self.size().saturating_mul(self.page() - 1)
    }

    pub fn total_pages(&self, total_rows: i64) -> i64 {
        total_pages(total_rows, self.size())
    }
}

/// `ceil(total_rows / page_size)` in integer arithmetic
pub fn total_pages(total_rows: i64, page_size: i64) -> i64 {
    if page_size <= 0 || total_rows <= 0 {
        return 0;
    }
    let mut pages = total_rows / page_size;
    if total_rows % page_size != 0 {
        pages += 1;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(8, 5), 2);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(1, 5), 1);
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageInfo::new(1, 5).offset(), 0);
        assert_eq!(PageInfo::new(2, 5).offset(), 5);
        assert_eq!(PageInfo::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_page_size_has_a_floor() {
        let page = PageInfo::new(2, 1);
        assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), DEFAULT_PAGE_SIZE);

        let page = PageInfo::new(1, 0);
        assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages(8), 2);
    }

    #[test]
    fn test_page_size_has_a_ceiling() {
        let page = PageInfo::new(3, i64::MAX);
        assert_eq!(page.size(), MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 2 * MAX_PAGE_SIZE);
        assert_eq!(page.total_pages(101), 3);
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let page = PageInfo::new(i64::MAX, 5);
        assert_eq!(page.page(), i64::MAX);
        assert_eq!(page.offset(), i64::MAX);

        let page = PageInfo::new(i64::MAX, i64::MAX);
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn test_page_number_below_one_is_first_page() {
        assert_eq!(PageInfo::new(0, 5).offset(), 0);
        assert_eq!(PageInfo::new(-3, 5).page(), 1);
    }
}

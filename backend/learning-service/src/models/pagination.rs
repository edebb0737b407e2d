use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// `page`/`limit` query parameters. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: i64) -> Self {
        let page = params.page();
        let limit = params.limit();
        Self {
            has_more: page.saturating_mul(limit) < total,
            items,
            page,
            limit,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let params = PageParams::new(Some(0), Some(1_000));
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_LIMIT);

        let params = PageParams::new(Some(-4), Some(0));
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn offset_uses_page_and_limit() {
        assert_eq!(PageParams::new(Some(3), Some(25)).offset(), 50);
        assert!(PageParams::new(Some(i64::MAX), Some(100)).offset() > 0);
    }

    #[test]
    fn has_more_reflects_remaining_rows() {
        let page = Paginated::new(vec![1, 2], PageParams::new(Some(1), Some(2)), 5);
        assert!(page.has_more);

        let last = Paginated::new(vec![5], PageParams::new(Some(3), Some(2)), 5);
        assert!(!last.has_more);
        assert_eq!(last.total, 5);
    }
}

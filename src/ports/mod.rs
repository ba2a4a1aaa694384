//! Ports - async trait seams between the application layer and adapters.

mod campaign_repository;
mod coupon_store;
mod event_publisher;
mod order_repository;
mod token_verifier;
mod usage_log;

pub use campaign_repository::CampaignRepository;
pub use coupon_store::{CouponFilter, CouponStore};
pub use event_publisher::EventPublisher;
pub use order_repository::OrderRepository;
pub use token_verifier::TokenVerifier;
pub use usage_log::{UsageFilter, UsageLog};

/// Pagination request shared by listing ports.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Rows per page.
    pub size: u32,
}

impl Page {
    /// Creates a page, clamping degenerate values to sane minimums and a
    /// hard upper bound on the page size.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.clamp(1, 100),
        }
    }

    /// Row offset for SQL queries.
    pub fn offset(&self) -> u64 {
        (self.number as u64 - 1) * self.size as u64
    }

    /// Number of pages needed for `total` rows.
    pub fn pages_for(&self, total: u64) -> u64 {
        total.div_ceil(self.size as u64)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_degenerate_values() {
        let page = Page::new(0, 0);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 1);

        let big = Page::new(1, 10_000);
        assert_eq!(big.size, 100);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(Page::new(1, 10).offset(), 0);
        assert_eq!(Page::new(3, 10).offset(), 20);
    }

    #[test]
    fn pages_for_rounds_up() {
        let page = Page::new(1, 10);
        assert_eq!(page.pages_for(0), 0);
        assert_eq!(page.pages_for(10), 1);
        assert_eq!(page.pages_for(11), 2);
    }
}

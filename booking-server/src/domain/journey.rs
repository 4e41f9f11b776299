//! Journey and pagination types.
//!
//! A `Journey` is a departure/arrival stop pair of one train resolved onto
//! concrete calendar dates.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use super::ids::{StationId, TrainId};

/// A resolved trip on one train between two stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    pub train_id: TrainId,
    pub train_name: String,
    pub departure_station_id: StationId,
    pub departure_station_name: String,
    pub arrival_station_id: StationId,
    pub arrival_station_name: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    /// Elapsed travel time, across day boundaries.
    pub travel_duration: Duration,
}

/// A normalised page request.
///
/// Out-of-range values are clamped rather than rejected: the page is at
/// least 1 and the page size lies within `1..=max_page_size`.
///
/// # Examples
///
/// ```
/// use booking_server::domain::PageRequest;
///
/// let req = PageRequest::clamped(0, 500, 100);
/// assert_eq!(req.page(), 1);
/// assert_eq!(req.page_size(), 100);
///
/// let req = PageRequest::clamped(3, 10, 100);
/// assert_eq!(req.window().offset, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Clamp raw caller values into a valid request.
    pub fn clamped(page: i64, page_size: i64, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            page: page.clamp(1, i64::from(u32::MAX)) as u32,
            page_size: page_size.clamp(1, i64::from(max_page_size)) as u32,
        }
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Limit/offset window for a store query.
    pub fn window(&self) -> PageWindow {
        let offset = u64::from(self.page - 1) * u64::from(self.page_size);
        PageWindow {
            limit: self.page_size as usize,
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
        }
    }
}

/// Limit/offset pair applied to an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Pagination summary returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Summarise a request against the total item count.
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.page_size())),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Clamped values always lie in range.
        #[test]
        fn clamped_in_range(page in any::<i64>(), size in any::<i64>(), max in 1u32..500) {
            let req = PageRequest::clamped(page, size, max);
            prop_assert!(req.page() >= 1);
            prop_assert!(req.page_size() >= 1 && req.page_size() <= max);
        }

        /// total_pages = ceil(total_items / page_size)
        #[test]
        fn total_pages_is_ceiling(total in 0u64..1_000_000, size in 1i64..=100) {
            let req = PageRequest::clamped(1, size, 100);
            let pages = Pagination::new(req, total).total_pages;
            let size = size as u64;
            prop_assert!(pages * size >= total);
            prop_assert!(pages == 0 || (pages - 1) * size < total);
        }
    }
}

//! Client-side date window restriction for historical series.

use crate::models::{DateRange, Quote};

/// Keep the quotes whose trade time lies within `range` (both ends
/// inclusive), in input order.
///
/// The input is not assumed to be sorted.
pub fn filter_by_range(quotes: Vec<Quote>, range: &DateRange) -> Vec<Quote> {
    quotes
        .into_iter()
        .filter(|q| range.contains(&q.trade_date_time))
        .collect()
}

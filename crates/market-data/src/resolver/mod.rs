//! Symbol resolution for the quote source.
//!
//! Converts a (market, ticker) pair into the fully-qualified identifier the
//! remote site expects:
//!
//! ```text
//! (USA, "AAPL") ──▶ "AAPL"
//! (GBR, "VOD")  ──▶ "VOD.L"
//! (CAN, "SHOP") ──▶ "SHOP.TO"
//! ```
//!
//! Ticker syntax is not validated here. A ticker the site does not know
//! shows up later as a failed or empty parse.

use crate::models::Market;

/// Build the fully-qualified identifier for `ticker` on `market`.
pub fn resolve_full_id(market: Market, ticker: &str) -> String {
    match market.short_code() {
        None => ticker.to_string(),
        Some(suffix) => format!("{}.{}", ticker, suffix),
    }
}

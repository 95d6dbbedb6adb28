use std::fmt;

use serde::{Deserialize, Serialize};

use super::market::Market;

/// A ticker on a given market, as the caller knows it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockId {
    pub market: Market,
    pub ticker: String,
}

impl StockId {
    pub fn new(market: Market, ticker: impl Into<String>) -> Self {
        Self {
            market,
            ticker: ticker.into(),
        }
    }

    /// Fully-qualified identifier understood by the remote site.
    ///
    /// See [`resolve_full_id`](crate::resolver::resolve_full_id).
    pub fn full_id(&self) -> String {
        crate::resolver::resolve_full_id(self.market, &self.ticker)
    }
}

impl fmt::Display for StockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.market, self.ticker)
    }
}

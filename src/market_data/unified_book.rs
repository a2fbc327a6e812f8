use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::engine::types::{validate_qty, PriceLevel, QuoteError, Side};
use crate::engine::walker::walk;

/// Combined view across venues. Bids are sorted best (highest) first, asks
/// best (lowest) first. Levels at the same price from different venues stay
/// as separate entries, in the order their venues were supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedBook {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// Concatenate every venue's levels per side and sort. No validation happens
/// here; adapters are responsible for rejecting bad levels.
pub fn aggregate<B, A>(bid_lists: B, ask_lists: A) -> AggregatedBook
where
    B: IntoIterator,
    B::Item: AsRef<[PriceLevel]>,
    A: IntoIterator,
    A::Item: AsRef<[PriceLevel]>,
{
    let mut bids: Vec<PriceLevel> = bid_lists
        .into_iter()
        .flat_map(|side| side.as_ref().to_vec())
        .collect();
    let mut asks: Vec<PriceLevel> = ask_lists
        .into_iter()
        .flat_map(|side| side.as_ref().to_vec())
        .collect();

    // sort_by_key is stable, so ties keep their input order
    bids.sort_by_key(|level| Reverse(OrderedFloat(level.price)));
    asks.sort_by_key(|level| OrderedFloat(level.price));

    debug!(bids = bids.len(), asks = asks.len(), "Aggregated book");
    AggregatedBook { bids, asks }
}

impl AggregatedBook {
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }

    pub fn side(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Walk `side` for `qty`. Asks price a buy, bids price a sell.
    pub fn fill_cost(&self, side: Side, qty: f64) -> Result<f64, QuoteError> {
        let qty = validate_qty(qty)?;
        walk(self.side(side), qty)
            .map_err(|e| QuoteError::InsufficientLiquidity { side, requested: e.requested })
    }

    pub fn buy_cost(&self, qty: f64) -> Result<f64, QuoteError> {
        self.fill_cost(Side::Ask, qty)
    }

    pub fn sell_revenue(&self, qty: f64) -> Result<f64, QuoteError> {
        self.fill_cost(Side::Bid, qty)
    }
}

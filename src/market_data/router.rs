// Router: fan out to venues, merge what came back, price both sides
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::engine::types::{validate_qty, OrderBookSnapshot, QuoteError, Side};
use crate::market_data::adapters::{VenueError, VenueSource};
use crate::market_data::unified_book::{aggregate, AggregatedBook};

#[derive(Debug)]
pub struct VenueFailure {
    pub venue: String,
    pub error: VenueError,
}

/// Snapshots that arrived plus the venues that didn't answer. A failed venue
/// simply contributes nothing to either side.
#[derive(Debug, Default)]
pub struct Collected {
    pub snapshots: Vec<Arc<OrderBookSnapshot>>,
    pub failures: Vec<VenueFailure>,
}

impl Collected {
    pub fn book(&self) -> AggregatedBook {
        aggregate(
            self.snapshots.iter().map(|s| &s.bids),
            self.snapshots.iter().map(|s| &s.asks),
        )
    }

    fn has_side(&self, side: Side) -> bool {
        self.snapshots.iter().any(|s| match side {
            Side::Bid => !s.bids.is_empty(),
            Side::Ask => !s.asks.is_empty(),
        })
    }
}

#[derive(Debug)]
pub struct SidedQuote {
    pub buy_cost: Result<f64, QuoteError>,
    pub sell_revenue: Result<f64, QuoteError>,
}

#[derive(Debug)]
pub struct QuoteReport {
    pub qty: f64,
    pub failures: Vec<VenueFailure>,
    pub outcome: Result<SidedQuote, QuoteError>,
}

impl QuoteReport {
    /// True when at least one venue failed, so the combined book was partial.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Ask every venue concurrently; failures are isolated per venue.
pub async fn collect(venues: &[Box<dyn VenueSource>]) -> Collected {
    let results = join_all(venues.iter().map(|v| v.snapshot())).await;

    let mut collected = Collected::default();
    for (venue, result) in venues.iter().zip(results) {
        match result {
            Ok(snapshot) => collected.snapshots.push(snapshot),
            Err(error) => {
                warn!(venue = venue.name(), %error, "Venue fetch failed, continuing without it");
                metrics::counter!("lobagg_venue_failures_total", "venue" => venue.name().to_string()).increment(1);
                collected.failures.push(VenueFailure { venue: venue.name().to_string(), error });
            }
        }
    }
    collected
}

/// Price a market buy and a market sell of `qty` against every venue's
/// combined liquidity.
///
/// An invalid `qty` short-circuits before any venue is contacted. If no venue
/// supplied bids (checked first) or none supplied asks, no pricing is done.
/// Otherwise each side is priced on its own, so a thin ask side never hides a
/// sell quote.
#[instrument(skip(venues), fields(venues = venues.len()))]
pub async fn quote(venues: &[Box<dyn VenueSource>], qty: f64) -> QuoteReport {
    if let Err(e) = validate_qty(qty) {
        return QuoteReport { qty, failures: Vec::new(), outcome: Err(e) };
    }

    let collected = collect(venues).await;
    let outcome = price(&collected, qty);
    if let Ok(sided) = &outcome {
        info!(
            qty,
            buy = ?sided.buy_cost.as_ref().ok(),
            sell = ?sided.sell_revenue.as_ref().ok(),
            failed_venues = collected.failures.len(),
            "Quote computed"
        );
    }
    QuoteReport { qty, failures: collected.failures, outcome }
}

fn price(collected: &Collected, qty: f64) -> Result<SidedQuote, QuoteError> {
    for side in [Side::Bid, Side::Ask] {
        if !collected.has_side(side) {
            return Err(QuoteError::NoDataAvailable { side });
        }
    }

    let book = collected.book();
    Ok(SidedQuote { buy_cost: book.buy_cost(qty), sell_revenue: book.sell_revenue(qty) })
}

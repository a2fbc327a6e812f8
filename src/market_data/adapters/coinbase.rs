// Coinbase Exchange level-2 book over REST

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::coinbase_types::CoinbaseBook;
use super::VenueError;
use crate::engine::types::OrderBookSnapshot;
use crate::market_data::cache::Fetch;
use crate::market_data::normaliser::parse_side;

pub struct CoinbaseAdapter {
    client: reqwest::Client,
    pub book_url: String, // e.g. ".../products/BTC-USD/book?level=2"
}

impl CoinbaseAdapter {
    pub fn new(client: reqwest::Client, book_url: &str) -> Self {
        Self { client, book_url: book_url.to_string() }
    }

    pub fn into_snapshot(book: &CoinbaseBook) -> Result<OrderBookSnapshot, VenueError> {
        let bids = parse_side(book.bids.iter().map(|l| (l.0.as_str(), l.1.as_str())))?;
        let asks = parse_side(book.asks.iter().map(|l| (l.0.as_str(), l.1.as_str())))?;
        Ok(OrderBookSnapshot::new(bids, asks))
    }
}

#[async_trait]
impl Fetch for CoinbaseAdapter {
    type Output = OrderBookSnapshot;
    type Error = VenueError;

    #[instrument(name = "coinbase_fetch", skip(self), fields(url = %self.book_url))]
    async fn fetch(&self) -> Result<OrderBookSnapshot, VenueError> {
        let res = self.client.get(&self.book_url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(VenueError::Status { status: status.as_u16() });
        }

        let book: CoinbaseBook = res.json().await?;
        let snapshot = Self::into_snapshot(&book)?;
        debug!(sequence = ?book.sequence, bids = snapshot.bids.len(), asks = snapshot.asks.len(), "Fetched Coinbase book");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::PriceLevel;

    const PAYLOAD: &str = r#"{
        "bids": [["67010.5","0.25",3],["67010.01","1.1",1]],
        "asks": [["67011.2","0.5",2]],
        "sequence": 8812345, "auction_mode": false, "auction": null,
        "time": "2024-04-05T12:00:00.000Z"
    }"#;

    #[test]
    fn test_into_snapshot() {
        let book: CoinbaseBook = serde_json::from_str(PAYLOAD).unwrap();
        let snap = CoinbaseAdapter::into_snapshot(&book).unwrap();
        assert_eq!(snap.bids, vec![PriceLevel::new(67010.5, 0.25), PriceLevel::new(67010.01, 1.1)]);
        assert_eq!(snap.asks, vec![PriceLevel::new(67011.2, 0.5)]);
        assert_eq!(book.sequence, Some(8812345));
    }

    #[test]
    fn test_bad_level_rejects_snapshot() {
        let book: CoinbaseBook = serde_json::from_str(r#"{"bids":[["oops","1",1]],"asks":[]}"#).unwrap();
        assert!(matches!(
            CoinbaseAdapter::into_snapshot(&book),
            Err(VenueError::Malformed { field: "price", .. })
        ));
    }
}

// Gemini public book over REST

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::gemini_types::GeminiBook;
use super::VenueError;
use crate::engine::types::OrderBookSnapshot;
use crate::market_data::cache::Fetch;
use crate::market_data::normaliser::parse_side;

pub struct GeminiAdapter {
    client: reqwest::Client,
    pub book_url: String, // e.g. "https://api.gemini.com/v1/book/BTCUSD"
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, book_url: &str) -> Self {
        Self { client, book_url: book_url.to_string() }
    }

    pub fn into_snapshot(book: &GeminiBook) -> Result<OrderBookSnapshot, VenueError> {
        let bids = parse_side(book.bids.iter().map(|l| (l.price.as_str(), l.amount.as_str())))?;
        let asks = parse_side(book.asks.iter().map(|l| (l.price.as_str(), l.amount.as_str())))?;
        Ok(OrderBookSnapshot::new(bids, asks))
    }
}

#[async_trait]
impl Fetch for GeminiAdapter {
    type Output = OrderBookSnapshot;
    type Error = VenueError;

    #[instrument(name = "gemini_fetch", skip(self), fields(url = %self.book_url))]
    async fn fetch(&self) -> Result<OrderBookSnapshot, VenueError> {
        let res = self.client.get(&self.book_url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(VenueError::Status { status: status.as_u16() });
        }

        let book: GeminiBook = res.json().await?;
        let snapshot = Self::into_snapshot(&book)?;
        debug!(bids = snapshot.bids.len(), asks = snapshot.asks.len(), "Fetched Gemini book");
        Ok(snapshot)
    }
}

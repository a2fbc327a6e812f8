// Shared trait + cached wrapper for venue adapters

use std::sync::Arc;
use std::time::Duration;

use crate::engine::types::OrderBookSnapshot;
use crate::market_data::cache::{Fetch, RateLimitedCache};

pub use errors::VenueError;

/// A venue the router can ask for a book. Adapters produce raw snapshots via
/// [`Fetch`]; the router only ever sees them through this trait.
#[async_trait::async_trait]
pub trait VenueSource: Send + Sync {
    fn name(&self) -> &str;

    async fn snapshot(&self) -> Result<Arc<OrderBookSnapshot>, VenueError>;
}

// Puts a RateLimitedCache in front of an adapter
pub struct CachedVenue<F: Fetch> {
    name: String,
    cache: RateLimitedCache<F>,
}

impl<F> CachedVenue<F>
where
    F: Fetch<Output = OrderBookSnapshot, Error = VenueError>,
{
    pub fn new(name: &str, adapter: F, min_interval: Duration, single_flight: bool) -> Self {
        let mut cache = RateLimitedCache::new(min_interval, adapter).with_label(name.to_lowercase());
        if single_flight {
            cache = cache.single_flight();
        }
        Self { name: name.to_string(), cache }
    }

    pub fn cache(&self) -> &RateLimitedCache<F> {
        &self.cache
    }
}

#[async_trait::async_trait]
impl<F> VenueSource for CachedVenue<F>
where
    F: Fetch<Output = OrderBookSnapshot, Error = VenueError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn snapshot(&self) -> Result<Arc<OrderBookSnapshot>, VenueError> {
        self.cache.get().await
    }
}

pub mod coinbase;
pub mod coinbase_types;
pub mod errors;
pub mod gemini;
pub mod gemini_types;

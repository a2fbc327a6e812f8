// Source: GET https://api.exchange.coinbase.com/products/{product}/book?level=2
use serde::de::IgnoredAny;

#[derive(Debug, serde::Deserialize)]
pub struct CoinbaseBook {
    #[serde(default)]
    pub sequence: Option<u64>,
    pub bids: Vec<CoinbaseLevel>,
    pub asks: Vec<CoinbaseLevel>,
}

// [price, size, num_orders]; prices and sizes are decimal strings
#[derive(Debug, serde::Deserialize)]
pub struct CoinbaseLevel(pub String, pub String, pub IgnoredAny);

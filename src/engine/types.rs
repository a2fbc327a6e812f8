use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

// Quantity available at a single price on one venue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub size: f64,
}

impl PriceLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

impl From<(f64, f64)> for PriceLevel {
    fn from((price, size): (f64, f64)) -> Self {
        Self { price, size }
    }
}

/// One venue's book at one point in time. Levels arrive in whatever order the
/// venue sent them; the aggregator imposes ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }
}

// Raised by the walker; carries no partial-fill value on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("insufficient liquidity to fill {requested}")]
pub struct InsufficientLiquidity {
    pub requested: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("quantity must be a positive finite number, got {0}")]
    InvalidQuantity(f64),

    #[error("Insufficient liquidity to {} the requested quantity ({requested}).", verb(.side))]
    InsufficientLiquidity { side: Side, requested: f64 },

    #[error("No {side} data available from any exchange.")]
    NoDataAvailable { side: Side },
}

// Buying consumes asks, selling consumes bids.
fn verb(side: &Side) -> &'static str {
    match side {
        Side::Ask => "buy",
        Side::Bid => "sell",
    }
}

pub fn validate_qty(qty: f64) -> Result<f64, QuoteError> {
    if qty.is_finite() && qty > 0.0 {
        Ok(qty)
    } else {
        Err(QuoteError::InvalidQuantity(qty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QuoteError::NoDataAvailable { side: Side::Bid };
        assert_eq!(err.to_string(), "No bid data available from any exchange.");

        let err = QuoteError::InsufficientLiquidity { side: Side::Ask, requested: 2.0 };
        assert_eq!(err.to_string(), "Insufficient liquidity to buy the requested quantity (2).");
    }

    #[test]
    fn test_validate_qty() {
        assert_eq!(validate_qty(1.5), Ok(1.5));
        assert_eq!(validate_qty(0.0), Err(QuoteError::InvalidQuantity(0.0)));
        assert_eq!(validate_qty(-3.0), Err(QuoteError::InvalidQuantity(-3.0)));
        assert!(matches!(validate_qty(f64::NAN), Err(QuoteError::InvalidQuantity(_))));
        assert!(validate_qty(f64::INFINITY).is_err());
    }
}

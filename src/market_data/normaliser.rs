// Convert wire strings into validated price levels.
// Venues send decimals as strings; anything that doesn't parse, isn't finite,
// or breaks price > 0 / size >= 0 is rejected here so the core never sees it.

use crate::engine::types::PriceLevel;
use crate::market_data::adapters::VenueError;

pub fn parse_price(s: &str) -> Result<f64, VenueError> {
    match s.trim().parse::<f64>() {
        Ok(px) if px.is_finite() && px > 0.0 => Ok(px),
        _ => Err(VenueError::Malformed { field: "price", value: s.to_string() }),
    }
}

pub fn parse_size(s: &str) -> Result<f64, VenueError> {
    match s.trim().parse::<f64>() {
        Ok(sz) if sz.is_finite() && sz >= 0.0 => Ok(sz),
        _ => Err(VenueError::Malformed { field: "size", value: s.to_string() }),
    }
}

pub fn parse_level(px: &str, sz: &str) -> Result<PriceLevel, VenueError> {
    Ok(PriceLevel::new(parse_price(px)?, parse_size(sz)?))
}

/// Normalise one side; the first bad level fails the whole snapshot.
pub fn parse_side<'a, I>(raw: I) -> Result<Vec<PriceLevel>, VenueError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    raw.into_iter().map(|(px, sz)| parse_level(px, sz)).collect()
}

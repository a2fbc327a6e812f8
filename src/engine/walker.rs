use tracing::{instrument, trace};

use crate::engine::types::{InsufficientLiquidity, PriceLevel};

/// Walk an already-sorted side of the book and return the notional needed to
/// fill exactly `qty`.
///
/// Asks sorted ascending price a market buy, bids sorted descending price a
/// market sell. Levels are consumed greedily in the order given; the walker
/// never re-sorts. If the side runs out before `qty` is filled the whole
/// quote fails, no partial total is returned.
#[instrument(level = "trace", skip(levels), fields(levels = levels.len()))]
pub fn walk(levels: &[PriceLevel], qty: f64) -> Result<f64, InsufficientLiquidity> {
    let mut remaining = qty;
    let mut total = 0.0;

    for level in levels {
        let taken = level.size.min(remaining);
        total += taken * level.price;
        remaining -= taken;
        trace!(price = level.price, taken, remaining, "Consumed level");
        if remaining <= 0.0 {
            break;
        }
    }

    if remaining > 0.0 {
        return Err(InsufficientLiquidity { requested: qty });
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn levels(raw: &[(f64, f64)]) -> Vec<PriceLevel> {
        raw.iter().copied().map(PriceLevel::from).collect()
    }

    #[test]
    fn test_buy_spans_two_levels() {
        let asks = levels(&[(100.0, 1.0), (101.0, 2.0)]);
        assert_eq!(walk(&asks, 2.0), Ok(201.0));
    }

    #[test]
    fn test_insufficient_liquidity() {
        let asks = levels(&[(100.0, 1.0)]);
        assert_eq!(walk(&asks, 2.0), Err(InsufficientLiquidity { requested: 2.0 }));
    }

    #[test]
    fn test_empty_side() {
        assert!(walk(&[], 0.5).is_err());
    }

    #[test]
    fn test_exact_depth_fills() {
        let bids = levels(&[(100.0, 2.0), (99.0, 1.0)]);
        assert_eq!(walk(&bids, 3.0), Ok(299.0));
    }

    #[test]
    fn test_stops_at_first_sufficient_level() {
        // the trailing level would blow up the total if it were touched
        let asks = levels(&[(10.0, 5.0), (f64::MAX, 5.0)]);
        assert_eq!(walk(&asks, 5.0), Ok(50.0));
    }

    #[test]
    fn test_zero_size_levels_are_skipped() {
        let asks = levels(&[(50.0, 0.0), (60.0, 1.0)]);
        assert_eq!(walk(&asks, 0.5), Ok(30.0));
    }

    #[test]
    fn test_fractional_quantities() {
        let asks = levels(&[(100.0, 0.1), (200.0, 0.2)]);
        let total = walk(&asks, 0.3).unwrap();
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_float_depth_equal_to_qty_can_still_fall_short() {
        // 0.1 + 0.2 == qty, but 0.3...04 - 0.1 leaves 0.2...04 > 0.2, so a
        // tiny remainder survives the last level. No rounding is applied.
        let asks = levels(&[(1.0, 0.1), (2.0, 0.2)]);
        let qty = 0.1 + 0.2;
        let depth: f64 = asks.iter().map(|l| l.size).sum();

        assert!(depth >= qty);
        assert_eq!(walk(&asks, qty), Err(InsufficientLiquidity { requested: qty }));
    }

    // Whole-number sizes keep depth sums exact; see the test above for the
    // fractional case where "fails iff depth < qty" does not hold bit-for-bit.
    fn side() -> impl Strategy<Value = Vec<PriceLevel>> {
        prop::collection::vec((1u32..1_000, 0u32..50), 0..20).prop_map(|raw| {
            let mut levels: Vec<PriceLevel> = raw
                .into_iter()
                .map(|(p, s)| PriceLevel::new(p as f64, s as f64))
                .collect();
            levels.sort_by(|a, b| a.price.total_cmp(&b.price));
            levels
        })
    }

    proptest! {
        #[test]
        fn fails_iff_depth_is_short(asks in side(), qty in 1u32..300) {
            let qty = qty as f64;
            let depth: f64 = asks.iter().map(|l| l.size).sum();
            prop_assert_eq!(walk(&asks, qty).is_err(), depth < qty);
        }

        #[test]
        fn total_is_monotonic_in_qty(asks in side(), a in 1u32..300, b in 1u32..300) {
            let (lo, hi) = (a.min(b) as f64, a.max(b) as f64);
            if let (Ok(small), Ok(large)) = (walk(&asks, lo), walk(&asks, hi)) {
                prop_assert!(small <= large);
            }
        }
    }
}

//! Single-trajectory price path generation.

use crate::sim::rng::ShockSource;
use crate::types::AssetParameters;

/// Generate one price trajectory of `days` daily prices.
///
/// `prices[0]` is the asset's initial price; each later price applies one
/// linear step `p * (1 + drift + volatility * z)`, consuming one shock,
/// for `days - 1` stochastic steps in total.
///
/// The step is deliberately linear rather than exponential: a large
/// negative shock can push the price through zero. Paths are reported
/// as simulated; the return boundary decides what to do about it.
pub fn simulate_path(
    params: &AssetParameters,
    days: usize,
    shocks: &mut impl ShockSource,
) -> Vec<f64> {
    let mut prices = Vec::with_capacity(days);
    if days == 0 {
        return prices;
    }

    let mut price = params.initial_price;
    prices.push(price);

    for _ in 1..days {
        let daily_return = params.daily_drift + params.daily_volatility * shocks.next_shock();
        price *= 1.0 + daily_return;
        prices.push(price);
    }

    prices
}

/// Terminal percentage return of a path relative to its first price.
pub fn terminal_return_pct(prices: &[f64]) -> Option<f64> {
    let first = prices.first()?;
    let last = prices.last()?;
    Some((last - first) / first * 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

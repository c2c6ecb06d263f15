//! Dated synthetic price history for backtesting.

use chrono::{Duration, NaiveDate};

use crate::sim::{simulate_path, BoxMuller};
use crate::types::{AssetParameters, CompassError};

/// One day of price history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Generate `days` daily prices ending on `end_date`.
///
/// The stream is seeded from the asset name, so the same asset always
/// replays the same history. A path that overflows to a non-finite
/// price is rejected rather than fed into the strategy.
pub fn generate_series(
    params: &AssetParameters,
    days: usize,
    end_date: NaiveDate,
) -> Result<Vec<PricePoint>, CompassError> {
    params.validate()?;
    if days < 2 {
        return Err(CompassError::InvalidSetting(
            "backtest days must be at least 2".to_string(),
        ));
    }

    let mut shocks = BoxMuller::seeded(&params.name);
    let prices = simulate_path(params, days, &mut shocks);

    let start_date = end_date - Duration::days(days as i64 - 1);
    let mut series = Vec::with_capacity(days);
    for (i, price) in prices.into_iter().enumerate() {
        if !price.is_finite() {
            return Err(CompassError::NonFinite {
                asset: params.name.clone(),
                message: format!("price on day {i} is not finite"),
            });
        }
        series.push(PricePoint {
            date: start_date + Duration::days(i as i64),
            price,
        });
    }
    Ok(series)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

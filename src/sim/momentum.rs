//! Short-horizon momentum: a 0.7/0.3 blend of 7-day and 30-day
//! realized returns drawn from a dedicated per-asset stream.

use crate::sim::path::{simulate_path, terminal_return_pct};
use crate::sim::rng::{BoxMuller, ShockSource};
use crate::types::{AssetParameters, CompassError, MomentumScore};

const SHORT_WEIGHT: f64 = 0.7;
const LONG_WEIGHT: f64 = 0.3;
/// Daily prices in the short leg (6 stochastic steps).
const SHORT_DAYS: usize = 7;
/// Daily prices in the long leg (29 stochastic steps).
const LONG_DAYS: usize = 30;

/// Blend two realized-return legs from an explicit shock stream.
///
/// The short leg consumes its shocks first, then the long leg continues
/// on the same stream.
pub fn momentum_from_stream(
    params: &AssetParameters,
    shocks: &mut impl ShockSource,
) -> Result<MomentumScore, CompassError> {
    params.validate()?;

    let seven_day_pct = leg_return(params, SHORT_DAYS, shocks)?;
    let thirty_day_pct = leg_return(params, LONG_DAYS, shocks)?;

    Ok(MomentumScore {
        value: SHORT_WEIGHT * seven_day_pct + LONG_WEIGHT * thirty_day_pct,
        seven_day_pct,
        thirty_day_pct,
    })
}

fn leg_return(
    params: &AssetParameters,
    days: usize,
    shocks: &mut impl ShockSource,
) -> Result<f64, CompassError> {
    let path = simulate_path(params, days, shocks);
    let ret = terminal_return_pct(&path).unwrap_or(f64::NAN);
    if !ret.is_finite() {
        return Err(CompassError::NonFinite {
            asset: params.name.clone(),
            message: format!("{days}-day momentum leg is not finite"),
        });
    }
    Ok(ret)
}

/// Momentum for one asset, seeded from `<name>:momentum` so the signal
/// never perturbs (or is perturbed by) the main statistics stream.
pub fn momentum_score(params: &AssetParameters) -> Result<MomentumScore, CompassError> {
    let mut shocks = BoxMuller::seeded(&format!("{}:momentum", params.name));
    momentum_from_stream(params, &mut shocks)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Monte Carlo statistics: many trials reduced to one bundle per asset.

use std::cmp::Ordering;

use tracing::debug;

use crate::sim::path::{simulate_path, terminal_return_pct};
use crate::sim::rng::{BoxMuller, ShockSource};
use crate::types::{AssetParameters, CompassError, StatisticsBundle};

// ---------------------------------------------------------------------------
// Simulation configuration
// ---------------------------------------------------------------------------

/// Trial count and horizon for one statistics run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of independent trials (M).
    pub simulations: usize,
    /// Number of daily prices per trial, including the initial price.
    pub horizon_days: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: 2_000,
            horizon_days: 30,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), CompassError> {
        if self.simulations == 0 {
            return Err(CompassError::InvalidSetting(
                "simulations must be at least 1".to_string(),
            ));
        }
        if self.horizon_days < 2 {
            return Err(CompassError::InvalidSetting(
                "horizon_days must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trial collection
// ---------------------------------------------------------------------------

/// Run `cfg.simulations` independent paths and collect each trial's
/// terminal percentage return.
///
/// Extreme drift/volatility can overflow a path into `inf`/`NaN`; such a
/// trial surfaces as [`CompassError::NonFinite`] so the caller can skip
/// the asset and keep ranking the rest.
pub fn terminal_returns(
    params: &AssetParameters,
    cfg: &SimulationConfig,
    shocks: &mut impl ShockSource,
) -> Result<Vec<f64>, CompassError> {
    params.validate()?;
    cfg.validate()?;

    let mut returns = Vec::with_capacity(cfg.simulations);
    for trial in 0..cfg.simulations {
        let path = simulate_path(params, cfg.horizon_days, shocks);
        // horizon_days >= 2 was validated, so the path is never empty
        let ret = terminal_return_pct(&path).unwrap_or(f64::NAN);
        if !ret.is_finite() {
            return Err(CompassError::NonFinite {
                asset: params.name.clone(),
                message: format!("terminal return of trial {trial} is not finite"),
            });
        }
        returns.push(ret);
    }
    Ok(returns)
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Reduce a non-empty return sample to a [`StatisticsBundle`].
///
/// Percentiles index the sorted sample at `floor(M * q)` with no
/// interpolation. Volatility is the population standard deviation.
/// Sortino divides the mean by the RMS of the losing returns; with no
/// losing trial it is `+inf` for a positive mean and `0` otherwise.
pub fn summarize_returns(returns: &[f64]) -> Result<StatisticsBundle, CompassError> {
    if returns.is_empty() {
        return Err(CompassError::InvalidSetting(
            "cannot summarize an empty return sample".to_string(),
        ));
    }

    let m = returns.len();
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pick = |q: f64| sorted[((m as f64 * q) as usize).min(m - 1)];

    let mean = returns.iter().sum::<f64>() / m as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / m as f64;
    let std_dev = variance.sqrt();

    let sharpe = if std_dev > 0.0 { mean / std_dev } else { 0.0 };

    let losses: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let sortino = if losses.is_empty() {
        if mean > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        let downside_dev =
            (losses.iter().map(|r| r * r).sum::<f64>() / losses.len() as f64).sqrt();
        if downside_dev > 0.0 {
            mean / downside_dev
        } else {
            0.0
        }
    };

    Ok(StatisticsBundle {
        mean_return_pct: mean,
        median_return_pct: pick(0.50),
        p10: pick(0.10),
        p25: pick(0.25),
        p75: pick(0.75),
        p90: pick(0.90),
        probability_of_loss_pct: losses.len() as f64 / m as f64 * 100.0,
        volatility: std_dev,
        sharpe_ratio: sharpe,
        sortino_ratio: sortino,
        max_loss_pct: sorted[0],
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Full statistics run for one asset: a fresh shock stream seeded from
/// the asset name, `cfg.simulations` trials, one bundle out.
///
/// Two calls with the same asset and config produce bit-identical
/// bundles; the stream key is the asset name alone.
pub fn run_statistics(
    params: &AssetParameters,
    cfg: &SimulationConfig,
) -> Result<StatisticsBundle, CompassError> {
    debug!(
        asset = %params.name,
        simulations = cfg.simulations,
        horizon_days = cfg.horizon_days,
        "running return simulation"
    );
    let mut shocks = BoxMuller::seeded(&params.name);
    let returns = terminal_returns(params, cfg, &mut shocks)?;
    summarize_returns(&returns)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

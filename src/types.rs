//! Shared types for the COMPASS engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that catalog, simulation, scoring,
//! and engine modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Asset parameters
// ---------------------------------------------------------------------------

/// Per-asset simulation inputs, loaded from a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetParameters {
    pub name: String,
    /// Spot price at the start of every simulated path. Must be positive.
    pub initial_price: f64,
    /// Standard deviation of the daily return, as a fraction (0.03 = 3%).
    pub daily_volatility: f64,
    /// Expected daily return, as a fraction (0.0012 = 0.12%).
    pub daily_drift: f64,
}

impl fmt::Display for AssetParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ ${} (vol {:.2}%/day, drift {:+.3}%/day)",
            self.name,
            self.initial_price,
            self.daily_volatility * 100.0,
            self.daily_drift * 100.0,
        )
    }
}

impl AssetParameters {
    pub fn new(name: impl Into<String>, initial_price: f64, daily_volatility: f64, daily_drift: f64) -> Self {
        Self {
            name: name.into(),
            initial_price,
            daily_volatility,
            daily_drift,
        }
    }

    /// Check the catalog contract: positive finite price, non-negative
    /// finite volatility, finite drift, non-empty name.
    pub fn validate(&self) -> Result<(), CompassError> {
        let fail = |message: &str| {
            Err(CompassError::InvalidParameter {
                asset: self.name.clone(),
                message: message.to_string(),
            })
        };

        if self.name.trim().is_empty() {
            return Err(CompassError::InvalidParameter {
                asset: "<unnamed>".to_string(),
                message: "name must not be empty".to_string(),
            });
        }
        if !self.initial_price.is_finite() || self.initial_price <= 0.0 {
            return fail("initial_price must be a positive finite number");
        }
        if !self.daily_volatility.is_finite() || self.daily_volatility < 0.0 {
            return fail("daily_volatility must be a non-negative finite number");
        }
        if !self.daily_drift.is_finite() {
            return fail("daily_drift must be finite");
        }
        Ok(())
    }

    /// Helper to build a test asset with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        AssetParameters::new("Bitcoin", 45_000.0, 0.03, 0.0012)
    }
}

// ---------------------------------------------------------------------------
// Statistics bundle
// ---------------------------------------------------------------------------

/// Risk/return statistics reduced from M independent terminal returns.
///
/// Percentiles are read off the sorted sample at index `floor(M * q)`,
/// so `p10 <= p25 <= median <= p75 <= p90` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsBundle {
    pub mean_return_pct: f64,
    /// The 50th percentile of terminal returns (no interpolation).
    pub median_return_pct: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    /// Fraction of trials ending below the initial price, as a percentage.
    pub probability_of_loss_pct: f64,
    /// Population standard deviation of terminal returns.
    pub volatility: f64,
    /// Mean over standard deviation; zero when the sample is degenerate.
    pub sharpe_ratio: f64,
    /// Mean over downside deviation (RMS of the losing returns about zero).
    /// `+inf` when no trial lost money and the mean is positive.
    #[serde(with = "json_nonfinite")]
    pub sortino_ratio: f64,
    /// Worst terminal return observed across all trials.
    pub max_loss_pct: f64,
}

impl fmt::Display for StatisticsBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean {:+.2}% | med {:+.2}% | p10 {:+.2}% p90 {:+.2}% | loss {:.1}% | sharpe {:.2} sortino {:.2} | worst {:+.2}%",
            self.mean_return_pct,
            self.median_return_pct,
            self.p10,
            self.p90,
            self.probability_of_loss_pct,
            self.sharpe_ratio,
            self.sortino_ratio,
            self.max_loss_pct,
        )
    }
}

impl StatisticsBundle {
    /// The optimistic tail (the 90th percentile return).
    pub fn upside_potential(&self) -> f64 {
        self.p90
    }

    /// The pessimistic tail (the 10th percentile return).
    pub fn downside_risk(&self) -> f64 {
        self.p10
    }

    /// Helper to build a realistic bundle for scorer/engine tests.
    #[cfg(test)]
    pub fn sample() -> Self {
        StatisticsBundle {
            mean_return_pct: 10.0,
            median_return_pct: 8.0,
            p10: -20.0,
            p25: -5.0,
            p75: 22.0,
            p90: 41.0,
            probability_of_loss_pct: 35.0,
            volatility: 18.0,
            sharpe_ratio: 10.0 / 18.0,
            sortino_ratio: 0.9,
            max_loss_pct: -48.0,
        }
    }
}

/// `+inf` has no JSON representation; it crosses the wire as `null`.
mod json_nonfinite {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_some(v)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

// ---------------------------------------------------------------------------
// Momentum
// ---------------------------------------------------------------------------

/// Short-horizon trend signal: a 0.7/0.3 blend of the 7-day and 30-day
/// realized returns from a dedicated simulation stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumScore {
    /// `0.7 * seven_day_pct + 0.3 * thirty_day_pct`
    pub value: f64,
    pub seven_day_pct: f64,
    pub thirty_day_pct: f64,
}

impl fmt::Display for MomentumScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:+.2} (7d {:+.2}%, 30d {:+.2}%)",
            self.value, self.seven_day_pct, self.thirty_day_pct,
        )
    }
}

impl MomentumScore {
    /// Helper to build a momentum value for scorer/engine tests.
    #[cfg(test)]
    pub fn sample() -> Self {
        MomentumScore {
            value: 0.7 * 15.0 + 0.3 * 6.2,
            seven_day_pct: 15.0,
            thirty_day_pct: 6.2,
        }
    }
}

// ---------------------------------------------------------------------------
// Composite score
// ---------------------------------------------------------------------------

/// The clipped sub-scores that feed the composite, kept for reporting.
/// Every field is already clipped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub return_score: f64,
    pub sharpe_score: f64,
    pub sortino_score: f64,
    pub upside_score: f64,
    pub downside_score: f64,
    pub momentum_score: f64,
    pub risk_score: f64,
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ret {:.1} | sharpe {:.1} | sortino {:.1} | up {:.1} | down {:.1} | mom {:.1} | risk {:.1}",
            self.return_score,
            self.sharpe_score,
            self.sortino_score,
            self.upside_score,
            self.downside_score,
            self.momentum_score,
            self.risk_score,
        )
    }
}

/// A bounded [0, 100] ranking signal. Not a probability and not a return;
/// only relative order is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub value: f64,
    pub breakdown: ScoreBreakdown,
}

impl fmt::Display for CompositeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/100", self.value)
    }
}

// ---------------------------------------------------------------------------
// Recommendations & report
// ---------------------------------------------------------------------------

/// One ranked catalog entry with its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub asset: AssetParameters,
    pub composite: CompositeScore,
    pub stats: StatisticsBundle,
    pub momentum: MomentumScore,
    /// Share of capital, normalized so the returned set sums to 100.
    pub allocation_pct: f64,
}

impl fmt::Display for RankedRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}: score {:.1} alloc {:.1}% (mean {:+.2}%, loss {:.1}%)",
            self.rank,
            self.asset.name,
            self.composite.value,
            self.allocation_pct,
            self.stats.mean_return_pct,
            self.stats.probability_of_loss_pct,
        )
    }
}

/// Full output of one analysis pass, saved to disk after each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    /// Name of the weight profile that produced the scores.
    pub profile: String,
    pub simulations: usize,
    pub horizon_days: usize,
    pub recommendations: Vec<RankedRecommendation>,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | profile={} sims={} horizon={}d | {} recommendations",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.profile,
            self.simulations,
            self.horizon_days,
            self.recommendations.len(),
        )
    }
}

impl AnalysisReport {
    /// The top-ranked recommendation, if any.
    pub fn best(&self) -> Option<&RankedRecommendation> {
        self.recommendations.first()
    }

    /// Sum of all allocation percentages (100 for a non-degenerate run).
    pub fn total_allocation(&self) -> f64 {
        self.recommendations.iter().map(|r| r.allocation_pct).sum()
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for COMPASS.
///
/// None of these are fatal to a catalog run: the orchestrator logs the
/// offending asset and keeps ranking the rest.
#[derive(Debug, thiserror::Error)]
pub enum CompassError {
    #[error("Invalid parameters for {asset}: {message}")]
    InvalidParameter { asset: String, message: String },

    #[error("Invalid engine setting: {0}")]
    InvalidSetting(String),

    #[error("Unknown scoring profile: {0} (expected \"maximizer\" or \"predictor\")")]
    UnknownProfile(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Non-finite result for {asset}: {message}")]
    NonFinite { asset: String, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

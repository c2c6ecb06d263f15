//! Composite scoring: statistics plus momentum in, one bounded
//! [0, 100] ranking signal out.
//!
//! Every raw signal is rescaled by a named multiplier and clipped to
//! [0, 100] before the weighted combination, so the composite is bounded
//! no matter how extreme the inputs are. The weights are configuration,
//! not statistics; two built-in profiles ship and either can be swapped
//! for a hand-built one.

use crate::types::{CompassError, CompositeScore, MomentumScore, ScoreBreakdown, StatisticsBundle};

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Named multipliers and convex weights for the composite.
///
/// All fields are public so a caller can probe sensitivity by nudging a
/// single knob. `validate` enforces the convexity contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringProfile {
    pub return_multiplier: f64,
    pub sharpe_multiplier: f64,
    pub sortino_multiplier: f64,
    pub upside_multiplier: f64,
    pub momentum_multiplier: f64,

    pub return_weight: f64,
    pub sharpe_weight: f64,
    pub sortino_weight: f64,
    pub upside_weight: f64,
    pub downside_weight: f64,
    pub momentum_weight: f64,
    pub risk_weight: f64,
}

impl ScoringProfile {
    /// Tail-hungry profile: leans on mean return, the p90 upside and the
    /// Sortino ratio. The default.
    pub fn maximizer() -> Self {
        Self {
            return_multiplier: 3.0,
            sharpe_multiplier: 25.0,
            sortino_multiplier: 15.0,
            upside_multiplier: 2.0,
            momentum_multiplier: 2.0,

            return_weight: 0.35,
            sharpe_weight: 0.05,
            sortino_weight: 0.20,
            upside_weight: 0.25,
            downside_weight: 0.15,
            momentum_weight: 0.0,
            risk_weight: 0.0,
        }
    }

    /// Trend-following profile: mean return and Sharpe carry most of the
    /// weight, with momentum and loss probability filling the rest.
    pub fn predictor() -> Self {
        Self {
            return_multiplier: 2.0,
            sharpe_multiplier: 20.0,
            sortino_multiplier: 15.0,
            upside_multiplier: 2.0,
            momentum_multiplier: 2.0,

            return_weight: 0.40,
            sharpe_weight: 0.30,
            sortino_weight: 0.0,
            upside_weight: 0.0,
            downside_weight: 0.0,
            momentum_weight: 0.20,
            risk_weight: 0.10,
        }
    }

    /// Resolve a profile by its configuration name.
    pub fn from_name(name: &str) -> Result<Self, CompassError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "maximizer" => Ok(Self::maximizer()),
            "predictor" => Ok(Self::predictor()),
            other => Err(CompassError::UnknownProfile(other.to_string())),
        }
    }

    fn weights(&self) -> [f64; 7] {
        [
            self.return_weight,
            self.sharpe_weight,
            self.sortino_weight,
            self.upside_weight,
            self.downside_weight,
            self.momentum_weight,
            self.risk_weight,
        ]
    }

    /// The combination must stay convex: non-negative finite weights
    /// summing to 1, finite multipliers.
    pub fn validate(&self) -> Result<(), CompassError> {
        let weights = self.weights();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CompassError::InvalidSetting(
                "profile weights must be non-negative and finite".to_string(),
            ));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(CompassError::InvalidSetting(format!(
                "profile weights must sum to 1.0 (got {total})"
            )));
        }

        let multipliers = [
            self.return_multiplier,
            self.sharpe_multiplier,
            self.sortino_multiplier,
            self.upside_multiplier,
            self.momentum_multiplier,
        ];
        if multipliers.iter().any(|m| !m.is_finite()) {
            return Err(CompassError::InvalidSetting(
                "profile multipliers must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::maximizer()
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn clip(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Fold a statistics bundle and a momentum signal into one composite.
pub fn composite_score(
    profile: &ScoringProfile,
    stats: &StatisticsBundle,
    momentum: &MomentumScore,
) -> CompositeScore {
    // The +inf Sortino sentinel saturates regardless of the multiplier.
    let sortino_score = if stats.sortino_ratio.is_finite() {
        clip(stats.sortino_ratio * profile.sortino_multiplier)
    } else {
        100.0
    };

    let breakdown = ScoreBreakdown {
        return_score: clip(stats.mean_return_pct * profile.return_multiplier),
        sharpe_score: clip(stats.sharpe_ratio * profile.sharpe_multiplier),
        sortino_score,
        upside_score: clip(stats.p90 * profile.upside_multiplier),
        downside_score: clip(100.0 + stats.p10),
        momentum_score: clip(momentum.value * profile.momentum_multiplier),
        risk_score: clip(100.0 - stats.probability_of_loss_pct),
    };

    let value = breakdown.return_score * profile.return_weight
        + breakdown.sharpe_score * profile.sharpe_weight
        + breakdown.sortino_score * profile.sortino_weight
        + breakdown.upside_score * profile.upside_weight
        + breakdown.downside_score * profile.downside_weight
        + breakdown.momentum_score * profile.momentum_weight
        + breakdown.risk_score * profile.risk_weight;

    CompositeScore {
        value: clip(value),
        breakdown,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- profile tests --

    #[test]
    fn test_builtin_profiles_validate() {
        assert!(ScoringProfile::maximizer().validate().is_ok());
        assert!(ScoringProfile::predictor().validate().is_ok());
    }

    #[test]
    fn test_from_name() {
        assert!(ScoringProfile::from_name("maximizer").is_ok());
        assert!(ScoringProfile::from_name("predictor").is_ok());
        assert!(ScoringProfile::from_name("  Maximizer ").is_ok());
        assert!(matches!(
            ScoringProfile::from_name("balanced"),
            Err(CompassError::UnknownProfile(name)) if name == "balanced"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_weight_sum() {
        let mut profile = ScoringProfile::maximizer();
        profile.return_weight = 0.50;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut profile = ScoringProfile::maximizer();
        profile.return_weight = -0.10;
        profile.sharpe_weight = 0.50;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nonfinite_multiplier() {
        let mut profile = ScoringProfile::predictor();
        profile.momentum_multiplier = f64::NAN;
        assert!(profile.validate().is_err());
    }

    // -- scoring tests --

    #[test]
    fn test_maximizer_known_inputs() {
        let stats = StatisticsBundle::sample();
        let momentum = MomentumScore::sample();
        let score = composite_score(&ScoringProfile::maximizer(), &stats, &momentum);

        assert_eq!(score.breakdown.return_score, 30.0);
        assert_eq!(score.breakdown.upside_score, 82.0);
        assert_eq!(score.breakdown.sortino_score, 13.5);
        assert_eq!(score.breakdown.downside_score, 80.0);

        let expected = 30.0 * 0.35
            + (10.0 / 18.0 * 25.0) * 0.05
            + 13.5 * 0.20
            + 82.0 * 0.25
            + 80.0 * 0.15;
        assert!((score.value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_predictor_known_inputs() {
        let stats = StatisticsBundle::sample();
        let momentum = MomentumScore::sample();
        let score = composite_score(&ScoringProfile::predictor(), &stats, &momentum);

        let momentum_clipped = (0.7 * 15.0 + 0.3 * 6.2) * 2.0;
        let expected = 20.0 * 0.40
            + (10.0 / 18.0 * 20.0) * 0.30
            + momentum_clipped * 0.20
            + 65.0 * 0.10;
        assert!((score.value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounded_for_extreme_upside() {
        let stats = StatisticsBundle {
            mean_return_pct: 1e6,
            median_return_pct: 1e6,
            p10: 5e5,
            p25: 7e5,
            p75: 2e6,
            p90: 3e6,
            probability_of_loss_pct: 0.0,
            volatility: 1.0,
            sharpe_ratio: 1e6,
            sortino_ratio: f64::INFINITY,
            max_loss_pct: 5e5,
        };
        let momentum = MomentumScore {
            value: 1e6,
            seven_day_pct: 1e6,
            thirty_day_pct: 1e6,
        };

        for profile in [ScoringProfile::maximizer(), ScoringProfile::predictor()] {
            let score = composite_score(&profile, &stats, &momentum);
            assert!(score.value <= 100.0, "value: {}", score.value);
            assert!(score.value >= 0.0);
        }
    }

    #[test]
    fn test_score_bounded_for_extreme_downside() {
        let stats = StatisticsBundle {
            mean_return_pct: -1e6,
            median_return_pct: -1e6,
            p10: -3e6,
            p25: -2e6,
            p75: -7e5,
            p90: -5e5,
            probability_of_loss_pct: 100.0,
            volatility: 1.0,
            sharpe_ratio: -1e6,
            sortino_ratio: -50.0,
            max_loss_pct: -3e6,
        };
        let momentum = MomentumScore {
            value: -1e6,
            seven_day_pct: -1e6,
            thirty_day_pct: -1e6,
        };

        for profile in [ScoringProfile::maximizer(), ScoringProfile::predictor()] {
            let score = composite_score(&profile, &stats, &momentum);
            assert_eq!(score.value, 0.0);
        }
    }

    #[test]
    fn test_infinite_sortino_saturates_subscore() {
        let mut stats = StatisticsBundle::sample();
        stats.sortino_ratio = f64::INFINITY;
        let score = composite_score(
            &ScoringProfile::maximizer(),
            &stats,
            &MomentumScore::sample(),
        );
        assert_eq!(score.breakdown.sortino_score, 100.0);
    }

    #[test]
    fn test_single_knob_profile() {
        // All weight on the return sub-score makes the composite trace it
        let profile = ScoringProfile {
            return_multiplier: 1.0,
            return_weight: 1.0,
            sharpe_weight: 0.0,
            sortino_weight: 0.0,
            upside_weight: 0.0,
            downside_weight: 0.0,
            momentum_weight: 0.0,
            risk_weight: 0.0,
            ..ScoringProfile::maximizer()
        };
        profile.validate().unwrap();

        let mut stats = StatisticsBundle::sample();
        stats.mean_return_pct = 42.0;
        let score = composite_score(&profile, &stats, &MomentumScore::sample());
        assert!((score.value - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_profile_is_maximizer() {
        assert_eq!(ScoringProfile::default(), ScoringProfile::maximizer());
    }
}

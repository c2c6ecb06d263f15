//! The analysis engine: simulate, score and rank a whole catalog.
//!
//! One `analyze` call walks every catalog asset through the simulation
//! and scoring pipeline, sorts by composite score and turns the top N
//! into capital allocations. Assets that fail mid-pipeline are skipped
//! with a warning; they never abort the pass.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::{EngineConfig, ScoringConfig};
use crate::score::{composite_score, ScoringProfile};
use crate::sim::{momentum_score, run_statistics, SimulationConfig};
use crate::types::{
    AnalysisReport, AssetParameters, CompassError, CompositeScore, MomentumScore,
    RankedRecommendation, StatisticsBundle,
};

// ---------------------------------------------------------------------------
// Per-asset result
// ---------------------------------------------------------------------------

/// Everything the pipeline derives for one asset, pre-ranking.
#[derive(Debug, Clone)]
pub struct AssetAnalysis {
    pub asset: AssetParameters,
    pub stats: StatisticsBundle,
    pub momentum: MomentumScore,
    pub composite: CompositeScore,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Validated engine settings plus the resolved scoring profile.
pub struct AnalysisEngine {
    sim: SimulationConfig,
    profile: ScoringProfile,
    profile_name: String,
    top_n: usize,
}

impl AnalysisEngine {
    pub fn new(engine: &EngineConfig, scoring: &ScoringConfig) -> Result<Self, CompassError> {
        let profile = ScoringProfile::from_name(&scoring.profile)?;
        profile.validate()?;

        let sim = SimulationConfig {
            simulations: engine.simulations,
            horizon_days: engine.horizon_days,
        };
        sim.validate()?;

        if engine.top_n == 0 {
            return Err(CompassError::InvalidSetting(
                "top_n must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            sim,
            profile,
            profile_name: scoring.profile.trim().to_ascii_lowercase(),
            top_n: engine.top_n,
        })
    }

    pub fn simulation_config(&self) -> &SimulationConfig {
        &self.sim
    }

    /// Run the full pipeline for a single asset.
    pub fn analyze_asset(&self, params: &AssetParameters) -> Result<AssetAnalysis, CompassError> {
        let stats = run_statistics(params, &self.sim)?;
        let momentum = momentum_score(params)?;
        let composite = composite_score(&self.profile, &stats, &momentum);

        debug!(
            asset = %params.name,
            score = composite.value,
            mean_return_pct = stats.mean_return_pct,
            "asset analyzed"
        );

        Ok(AssetAnalysis {
            asset: params.clone(),
            stats,
            momentum,
            composite,
        })
    }

    /// Analyze every catalog asset and return the ranked report.
    ///
    /// Per-asset failures are logged and skipped; an all-failure pass
    /// yields a report with no recommendations rather than an error.
    pub fn analyze(&self, catalog: &Catalog) -> AnalysisReport {
        info!(
            assets = catalog.len(),
            simulations = self.sim.simulations,
            horizon_days = self.sim.horizon_days,
            profile = %self.profile_name,
            "starting catalog analysis"
        );

        let mut analyses = Vec::with_capacity(catalog.len());
        let mut skipped = 0usize;
        for params in catalog.iter() {
            match self.analyze_asset(params) {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => {
                    skipped += 1;
                    warn!(asset = %params.name, error = %e, "skipping asset");
                }
            }
        }

        let recommendations = rank_analyses(analyses, self.top_n);

        if let Some(best) = recommendations.first() {
            info!(
                ranked = recommendations.len(),
                skipped,
                best = %best.asset.name,
                best_score = best.composite.value,
                "catalog analysis complete"
            );
        } else {
            warn!(skipped, "catalog analysis produced no recommendations");
        }

        AnalysisReport {
            generated_at: Utc::now(),
            profile: self.profile_name.clone(),
            simulations: self.sim.simulations,
            horizon_days: self.sim.horizon_days,
            recommendations,
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking & allocation
// ---------------------------------------------------------------------------

/// Sort descending by composite score, keep the top N and convert the
/// surviving scores into allocation percentages summing to 100.
///
/// The sort is stable, so equal scores keep their catalog order. When
/// every surviving score is zero the split falls back to equal weights.
pub fn rank_analyses(
    mut analyses: Vec<AssetAnalysis>,
    top_n: usize,
) -> Vec<RankedRecommendation> {
    analyses.sort_by(|a, b| {
        b.composite
            .value
            .partial_cmp(&a.composite.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    analyses.truncate(top_n);

    if analyses.is_empty() {
        return Vec::new();
    }

    let total: f64 = analyses.iter().map(|a| a.composite.value).sum();
    let equal_share = 100.0 / analyses.len() as f64;
    if total <= 0.0 {
        warn!(
            candidates = analyses.len(),
            "all composite scores are zero, falling back to equal weights"
        );
    }

    analyses
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            let allocation_pct = if total > 0.0 {
                a.composite.value / total * 100.0
            } else {
                equal_share
            };
            RankedRecommendation {
                rank: i + 1,
                asset: a.asset,
                composite: a.composite,
                stats: a.stats,
                momentum: a.momentum,
                allocation_pct,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

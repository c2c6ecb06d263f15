//! End-to-end analysis pipeline tests.
//!
//! Drives the catalog → simulate → score → rank → size flow through the
//! public library surface, with small trial counts to keep the suite fast.

use compass::catalog::Catalog;
use compass::config::{EngineConfig, PortfolioConfig, ScoringConfig};
use compass::engine::AnalysisEngine;
use compass::storage;
use compass::strategy::{TradeDecision, TradePlanner};
use compass::types::AssetParameters;

fn small_catalog() -> Catalog {
    Catalog::from_assets(vec![
        AssetParameters::new("Alpha", 100.0, 0.02, 0.003),
        AssetParameters::new("Beta", 50.0, 0.05, 0.001),
        AssetParameters::new("Gamma", 2.5, 0.08, -0.002),
    ])
    .unwrap()
}

fn engine(simulations: usize, top_n: usize, profile: &str) -> AnalysisEngine {
    let engine_cfg = EngineConfig {
        simulations,
        top_n,
        ..EngineConfig::default()
    };
    let scoring_cfg = ScoringConfig {
        profile: profile.to_string(),
    };
    AnalysisEngine::new(&engine_cfg, &scoring_cfg).unwrap()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[test]
fn test_full_pipeline_ranks_all_assets() {
    let report = engine(200, 5, "maximizer").analyze(&small_catalog());

    assert_eq!(report.len(), 3);
    assert_eq!(report.profile, "maximizer");
    assert_eq!(report.simulations, 200);
    assert_eq!(report.horizon_days, 30);
    for (i, rec) in report.recommendations.iter().enumerate() {
        assert_eq!(rec.rank, i + 1);
        assert!(rec.composite.value >= 0.0 && rec.composite.value <= 100.0);
        assert!(rec.allocation_pct >= 0.0);
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let catalog = small_catalog();
    let a = engine(200, 3, "maximizer").analyze(&catalog);
    let b = engine(200, 3, "maximizer").analyze(&catalog);

    assert_eq!(a.len(), b.len());
    for (x, y) in a.recommendations.iter().zip(b.recommendations.iter()) {
        assert_eq!(x.asset.name, y.asset.name);
        assert_eq!(x.composite.value, y.composite.value);
        assert_eq!(x.allocation_pct, y.allocation_pct);
        assert_eq!(x.stats.mean_return_pct, y.stats.mean_return_pct);
        assert_eq!(x.momentum.value, y.momentum.value);
    }
}

#[test]
fn test_allocations_sum_to_100() {
    let report = engine(150, 3, "maximizer").analyze(&small_catalog());
    assert!(!report.is_empty());
    assert!((report.total_allocation() - 100.0).abs() < 1e-6);
}

#[test]
fn test_scores_descend_with_rank() {
    let report = engine(150, 3, "maximizer").analyze(&small_catalog());
    for pair in report.recommendations.windows(2) {
        assert!(pair[0].composite.value >= pair[1].composite.value);
    }
}

#[test]
fn test_top_n_truncates_builtin_catalog() {
    let report = engine(40, 5, "maximizer").analyze(&Catalog::builtin());
    assert_eq!(report.len(), 5);
    assert!((report.total_allocation() - 100.0).abs() < 1e-6);
}

#[test]
fn test_predictor_profile_ranks() {
    let report = engine(150, 3, "predictor").analyze(&small_catalog());
    assert_eq!(report.profile, "predictor");
    assert_eq!(report.len(), 3);
    assert!((report.total_allocation() - 100.0).abs() < 1e-6);
}

#[test]
fn test_pathological_asset_is_skipped() {
    // Finite but absurd drift overflows the path on the first step; the
    // asset fails with a non-finite return and the rest still ranks.
    let catalog = Catalog::from_assets(vec![
        AssetParameters::new("Sane", 100.0, 0.02, 0.001),
        AssetParameters::new("Runaway", 100.0, 0.0, 1e308),
    ])
    .unwrap();

    let report = engine(50, 5, "maximizer").analyze(&catalog);
    assert_eq!(report.len(), 1);
    assert_eq!(report.recommendations[0].asset.name, "Sane");
    assert!((report.recommendations[0].allocation_pct - 100.0).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Report persistence
// ---------------------------------------------------------------------------

#[test]
fn test_report_round_trip_through_storage() {
    let report = engine(100, 3, "maximizer").analyze(&small_catalog());

    let path = std::env::temp_dir().join(format!("compass_e2e_{}.json", uuid::Uuid::new_v4()));
    let path = path.to_str().unwrap().to_string();

    storage::save_report(&report, Some(&path)).unwrap();
    let loaded = storage::load_report(Some(&path)).unwrap().unwrap();

    assert_eq!(loaded.len(), report.len());
    assert_eq!(loaded.profile, report.profile);
    assert_eq!(
        loaded.recommendations[0].asset.name,
        report.recommendations[0].asset.name
    );
    assert_eq!(
        loaded.recommendations[0].composite.value,
        report.recommendations[0].composite.value
    );

    storage::delete_report(Some(&path)).unwrap();
}

// ---------------------------------------------------------------------------
// Trade planning
// ---------------------------------------------------------------------------

#[test]
fn test_trade_plan_respects_portfolio_limits() {
    let report = engine(100, 3, "maximizer").analyze(&small_catalog());

    let mut planner = TradePlanner::new(&PortfolioConfig::default()).unwrap();
    let (planned, decisions) = planner.plan(&report.recommendations);

    // One decision per recommendation, three orders capped at $100 each.
    assert_eq!(decisions.len(), report.len());
    assert_eq!(planned.len(), 3);
    let notional: f64 = planned.iter().map(|t| t.amount).sum();
    assert!(notional <= 500.0 + 1e-9);
    for trade in &planned {
        assert!(trade.amount <= 100.0 + 1e-9);
        assert!(trade.amount >= 10.0);
        assert!(trade.units > 0.0);
    }
}

#[test]
fn test_trade_plan_reports_volume_exhaustion() {
    let report = engine(100, 3, "maximizer").analyze(&small_catalog());

    let cfg = PortfolioConfig {
        capital: 10_000.0,
        max_position_size: 5_000.0,
        max_daily_volume: 150.0,
        min_trade_size: 10.0,
        max_positions: 10,
    };
    let mut planner = TradePlanner::new(&cfg).unwrap();
    let (planned, decisions) = planner.plan(&report.recommendations);

    // The first order swallows the whole $150 budget.
    assert_eq!(planned.len(), 1);
    assert!((planned[0].amount - 150.0).abs() < 1e-9);
    let exhausted = decisions
        .iter()
        .filter(|d| matches!(d, TradeDecision::VolumeExhausted { .. }))
        .count();
    assert_eq!(exhausted, 2);
}

//! Persistence layer.
//!
//! Saves and loads the latest analysis report as a JSON file so a rerun
//! (or an external consumer) can pick up where the last pass left off.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::AnalysisReport;

/// Default report file path.
const DEFAULT_REPORT_FILE: &str = "compass_report.json";

/// Save an analysis report to a JSON file.
pub fn save_report(report: &AnalysisReport, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_REPORT_FILE);
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialise analysis report")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write report to {path}"))?;

    debug!(path, recommendations = report.len(), "Report saved");
    Ok(())
}

/// Load an analysis report from a JSON file.
/// Returns None if the file doesn't exist (no previous run).
pub fn load_report(path: Option<&str>) -> Result<Option<AnalysisReport>> {
    let path = path.unwrap_or(DEFAULT_REPORT_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved report found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read report from {path}"))?;

    let report: AnalysisReport = serde_json::from_str(&json)
        .context(format!("Failed to parse report from {path}"))?;

    info!(
        path,
        generated_at = %report.generated_at,
        recommendations = report.len(),
        "Report loaded from disk"
    );

    Ok(Some(report))
}

/// Delete the report file (for testing or reset).
pub fn delete_report(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_REPORT_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete report file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AssetParameters, CompositeScore, MomentumScore, RankedRecommendation, ScoreBreakdown,
        StatisticsBundle,
    };
    use chrono::Utc;

    fn temp_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("compass_test_report_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            generated_at: Utc::now(),
            profile: "maximizer".to_string(),
            simulations: 2000,
            horizon_days: 30,
            recommendations: vec![RankedRecommendation {
                rank: 1,
                asset: AssetParameters::sample(),
                composite: CompositeScore {
                    value: 46.4,
                    breakdown: ScoreBreakdown {
                        return_score: 30.0,
                        sharpe_score: 13.9,
                        sortino_score: 13.5,
                        upside_score: 82.0,
                        downside_score: 80.0,
                        momentum_score: 24.7,
                        risk_score: 65.0,
                    },
                },
                stats: StatisticsBundle::sample(),
                momentum: MomentumScore::sample(),
                allocation_pct: 100.0,
            }],
        }
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path();
        let report = sample_report();
        save_report(&report, Some(&path)).unwrap();

        let loaded = load_report(Some(&path)).unwrap();
        assert!(loaded.is_some());
        let loaded = loaded.unwrap();
        assert_eq!(loaded.profile, "maximizer");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.recommendations[0].asset.name, "Bitcoin");

        delete_report(Some(&path)).unwrap();
    }

    #[test]
    fn test_load_nonexistent() {
        let path = "/tmp/compass_nonexistent_report_12345.json";
        let loaded = load_report(Some(path)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_preserves_infinite_sortino() {
        let path = temp_path();
        let mut report = sample_report();
        report.recommendations[0].stats.sortino_ratio = f64::INFINITY;

        save_report(&report, Some(&path)).unwrap();
        let loaded = load_report(Some(&path)).unwrap().unwrap();
        assert!(loaded.recommendations[0].stats.sortino_ratio.is_infinite());

        delete_report(Some(&path)).unwrap();
    }

    #[test]
    fn test_delete_report() {
        let path = temp_path();
        save_report(&sample_report(), Some(&path)).unwrap();
        assert!(Path::new(&path).exists());

        delete_report(Some(&path)).unwrap();
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_delete_nonexistent_ok() {
        let result = delete_report(Some("/tmp/compass_does_not_exist_xyz.json"));
        assert!(result.is_ok());
    }
}

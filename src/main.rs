//! COMPASS — Monte Carlo Crypto Analysis Engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the asset catalog, and dispatches to one of the operating
//! modes: analyze (one pass), watch (periodic loop), backtest.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::time::Duration;
use tracing::{error, info};

use compass::backtest::{Backtester, BacktestSummary};
use compass::catalog::Catalog;
use compass::config::AppConfig;
use compass::engine::AnalysisEngine;
use compass::storage;
use compass::strategy::{PlannedTrade, TradeDecision, TradePlanner};
use compass::types::AnalysisReport;

const BANNER: &str = r#"
  ____ ___  __  __ ____   _    ____ ____
 / ___/ _ \|  \/  |  _ \ / \  / ___/ ___|
| |  | | | | |\/| | |_) / _ \ \___ \___ \
| |__| |_| | |  | |  __/ ___ \ ___) |__) |
 \____\___/|_|  |_|_| /_/   \_\____/____/

  Composite Monte-carlo Portfolio Allocation Scoring System
  v0.1.0 — Synthetic Market Analysis
"#;

#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Monte Carlo crypto analysis and allocation engine")]
struct Args {
    /// Operating mode: analyze, watch, or backtest
    #[arg(long, default_value = "analyze")]
    mode: String,

    /// Path to the TOML configuration file
    #[arg(long, short, default_value = "config.toml")]
    config: String,

    /// Number of watch cycles to run (0 = run until Ctrl+C)
    #[arg(long, default_value_t = 0)]
    iterations: usize,

    /// Override how many assets to recommend
    #[arg(long)]
    top: Option<usize>,

    /// Override the report output path
    #[arg(long)]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let args = Args::parse();

    // Initialise structured logging before the config loader can speak
    init_logging();

    // Load configuration from TOML, falling back to defaults
    let mut cfg = AppConfig::load_or_default(&args.config)?;
    if let Some(top) = args.top {
        cfg.engine.top_n = top;
    }

    // Print startup banner
    println!("{BANNER}");
    info!(
        mode = %args.mode,
        simulations = cfg.engine.simulations,
        horizon_days = cfg.engine.horizon_days,
        profile = %cfg.scoring.profile,
        "COMPASS starting up"
    );

    // -- Build the catalog -------------------------------------------------

    let catalog = if cfg.catalog.path.is_empty() {
        Catalog::builtin()
    } else {
        Catalog::from_toml_file(&cfg.catalog.path)?
    };
    let catalog = catalog.with_price_overrides(&cfg.catalog.price_overrides);
    info!(assets = catalog.len(), "Catalog ready");

    // -- Dispatch ----------------------------------------------------------

    match args.mode.as_str() {
        "analyze" => run_analyze(&cfg, &catalog, args.out.as_deref()),
        "watch" => run_watch(&cfg, &catalog, args.iterations, args.out.as_deref()).await,
        "backtest" => run_backtest(&cfg, &catalog),
        other => {
            eprintln!("Unknown mode: {other}. Use: analyze, watch, or backtest");
            std::process::exit(1);
        }
    }
}

/// Run a single simulate→score→rank→size pass and persist the report.
fn run_analyze(cfg: &AppConfig, catalog: &Catalog, out: Option<&str>) -> Result<()> {
    let engine = AnalysisEngine::new(&cfg.engine, &cfg.scoring)?;
    let mut planner = TradePlanner::new(&cfg.portfolio)?;

    let report = engine.analyze(catalog);
    log_report(&report);

    let (planned, decisions) = planner.plan(&report.recommendations);
    log_trade_plan(&planned, &decisions);

    storage::save_report(&report, out)?;
    Ok(())
}

/// Re-run the analysis on an interval until Ctrl+C (or until the
/// requested number of cycles completes).
async fn run_watch(
    cfg: &AppConfig,
    catalog: &Catalog,
    iterations: usize,
    out: Option<&str>,
) -> Result<()> {
    let engine = AnalysisEngine::new(&cfg.engine, &cfg.scoring)?;
    let mut planner = TradePlanner::new(&cfg.portfolio)?;

    let mut interval =
        tokio::time::interval(Duration::from_secs(cfg.engine.analysis_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.engine.analysis_interval_secs,
        iterations,
        "Entering watch loop. Press Ctrl+C to stop."
    );

    let mut cycle = 0usize;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                cycle += 1;
                let report = engine.analyze(catalog);
                log_report(&report);

                planner.reset_cycle();
                let (planned, decisions) = planner.plan(&report.recommendations);
                log_trade_plan(&planned, &decisions);

                // Persist the report after each cycle
                if let Err(e) = storage::save_report(&report, out) {
                    error!(error = %e, "Failed to save report");
                }
                info!(cycle, recommendations = report.len(), "Cycle complete");

                if iterations > 0 && cycle >= iterations {
                    info!(cycles = cycle, "Requested cycle count reached.");
                    break;
                }
            }
            _ = &mut shutdown => {
                info!(cycles = cycle, "Shutdown signal received.");
                break;
            }
        }
    }

    Ok(())
}

/// Replay the golden-cross strategy over the whole catalog.
fn run_backtest(cfg: &AppConfig, catalog: &Catalog) -> Result<()> {
    let backtester = Backtester::new(&cfg.backtest)?;
    let summary = backtester.run_catalog(catalog, Utc::now().date_naive());
    log_backtest(cfg, &summary);
    Ok(())
}

/// Log a human-readable ranking table.
fn log_report(report: &AnalysisReport) {
    info!("================ ANALYSIS REPORT ================");
    info!(
        profile = %report.profile,
        simulations = report.simulations,
        horizon_days = report.horizon_days,
        total_allocation = format!("{:.1}%", report.total_allocation()),
        "Ranked {} assets",
        report.len()
    );
    for rec in &report.recommendations {
        info!("{rec}");
    }
}

/// Log the sized orders and the reasons behind every skip.
fn log_trade_plan(planned: &[PlannedTrade], decisions: &[TradeDecision]) {
    let notional: f64 = planned.iter().map(|t| t.amount).sum();
    info!("================== TRADE PLAN ===================");
    info!(
        orders = planned.len(),
        notional = format!("${notional:.2}"),
        "Sized orders for this cycle"
    );
    for decision in decisions {
        info!("{decision}");
    }
}

/// Log per-asset backtest outcomes plus catalog totals.
fn log_backtest(cfg: &AppConfig, summary: &BacktestSummary) {
    info!("============= GOLDEN CROSS BACKTEST =============");
    info!(
        days = cfg.backtest.days,
        short_window = cfg.backtest.short_window,
        long_window = cfg.backtest.long_window,
        "Moving average crossover replay"
    );
    for result in &summary.results {
        info!("{result}");
    }
    info!(
        total_initial = format!("${:.2}", summary.total_initial),
        total_final = format!("${:.2}", summary.total_final),
        total_return = format!("{:+.2}%", summary.total_return_pct),
        average_return = format!("{:+.2}%", summary.average_return_pct),
        total_trades = summary.total_trades,
        "Catalog totals"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("compass=info"));

    let json_logging = std::env::var("COMPASS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

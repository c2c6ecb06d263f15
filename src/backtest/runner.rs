//! Golden-cross backtesting engine.
//!
//! Replays a moving-average crossover strategy over synthetic price
//! history: buy everything when the short average crosses above the
//! long one, sell everything when it crosses back below, and mark the
//! final position to market.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::backtest::indicators::moving_averages;
use crate::backtest::series::{generate_series, PricePoint};
use crate::catalog::Catalog;
use crate::config::BacktestSection;
use crate::types::{AssetParameters, CompassError};

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// What the strategy did on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Hold,
    Buy,
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hold => write!(f, "HOLD"),
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

/// One day of the backtest: price, both averages and the resulting
/// portfolio state after any trade.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub price: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    pub signal: Signal,
    pub cash: f64,
    pub holdings: f64,
    pub portfolio_value: f64,
}

/// A fill, recorded at the moment of a cross.
#[derive(Debug, Clone)]
pub struct ExecutedTrade {
    pub date: NaiveDate,
    pub action: Signal,
    pub price: f64,
    pub units: f64,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Backtest outcome for a single asset.
#[derive(Debug, Clone)]
pub struct AssetBacktest {
    pub asset: String,
    pub initial_capital: f64,
    /// Cash plus holdings marked at the final price.
    pub final_value: f64,
    pub profit: f64,
    pub profit_pct: f64,
    pub ledger: Vec<LedgerRow>,
    pub trades: Vec<ExecutedTrade>,
}

impl fmt::Display for AssetBacktest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ${:.2} -> ${:.2} ({:+.2}%, {} trades)",
            self.asset,
            self.initial_capital,
            self.final_value,
            self.profit_pct,
            self.trades.len(),
        )
    }
}

/// Whole-catalog backtest, sorted best performer first.
#[derive(Debug, Clone)]
pub struct BacktestSummary {
    pub results: Vec<AssetBacktest>,
    pub total_initial: f64,
    pub total_final: f64,
    pub total_return_pct: f64,
    pub average_return_pct: f64,
    pub total_trades: usize,
}

impl BacktestSummary {
    pub fn best(&self) -> Option<&AssetBacktest> {
        self.results.first()
    }

    pub fn worst(&self) -> Option<&AssetBacktest> {
        self.results.last()
    }
}

// ---------------------------------------------------------------------------
// Backtester
// ---------------------------------------------------------------------------

pub struct Backtester {
    days: usize,
    initial_capital: f64,
    short_window: usize,
    long_window: usize,
}

impl Backtester {
    pub fn new(cfg: &BacktestSection) -> Result<Self, CompassError> {
        if cfg.days < 2 {
            return Err(CompassError::InvalidSetting(
                "backtest days must be at least 2".to_string(),
            ));
        }
        if !cfg.initial_capital.is_finite() || cfg.initial_capital <= 0.0 {
            return Err(CompassError::InvalidSetting(
                "backtest initial_capital must be positive".to_string(),
            ));
        }
        if cfg.short_window == 0 || cfg.short_window >= cfg.long_window {
            return Err(CompassError::InvalidSetting(
                "short_window must be positive and smaller than long_window".to_string(),
            ));
        }
        Ok(Self {
            days: cfg.days,
            initial_capital: cfg.initial_capital,
            short_window: cfg.short_window,
            long_window: cfg.long_window,
        })
    }

    /// Run the crossover strategy over an explicit price series.
    ///
    /// A buy is all-in, a sell liquidates everything; crosses landing on
    /// a non-positive price are ignored. An empty series yields an empty
    /// ledger with the capital untouched.
    pub fn run_series(&self, asset: &str, series: &[PricePoint]) -> AssetBacktest {
        let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
        let short = moving_averages(&prices, self.short_window);
        let long = moving_averages(&prices, self.long_window);

        let mut cash = self.initial_capital;
        let mut holdings = 0.0_f64;
        let mut in_position = false;
        let mut ledger = Vec::with_capacity(series.len());
        let mut trades = Vec::new();

        for (i, point) in series.iter().enumerate() {
            let mut signal = Signal::Hold;

            if i > 0 && point.price > 0.0 {
                let crossed_up = short[i - 1] <= long[i - 1] && short[i] > long[i];
                let crossed_down = short[i - 1] >= long[i - 1] && short[i] < long[i];

                if crossed_up && !in_position {
                    signal = Signal::Buy;
                    let units = cash / point.price;
                    trades.push(ExecutedTrade {
                        date: point.date,
                        action: Signal::Buy,
                        price: point.price,
                        units,
                        value: cash,
                    });
                    holdings = units;
                    cash = 0.0;
                    in_position = true;
                    debug!(asset, date = %point.date, price = point.price, units, "buy");
                } else if crossed_down && in_position {
                    signal = Signal::Sell;
                    let value = holdings * point.price;
                    trades.push(ExecutedTrade {
                        date: point.date,
                        action: Signal::Sell,
                        price: point.price,
                        units: holdings,
                        value,
                    });
                    cash = value;
                    holdings = 0.0;
                    in_position = false;
                    debug!(asset, date = %point.date, price = point.price, value, "sell");
                }
            }

            ledger.push(LedgerRow {
                date: point.date,
                price: point.price,
                short_ma: short[i],
                long_ma: long[i],
                signal,
                cash,
                holdings,
                portfolio_value: cash + holdings * point.price,
            });
        }

        let final_value = ledger
            .last()
            .map(|row| row.portfolio_value)
            .unwrap_or(self.initial_capital);
        let profit = final_value - self.initial_capital;

        AssetBacktest {
            asset: asset.to_string(),
            initial_capital: self.initial_capital,
            final_value,
            profit,
            profit_pct: profit / self.initial_capital * 100.0,
            ledger,
            trades,
        }
    }

    /// Generate the asset's synthetic history and run the strategy on it.
    pub fn run_asset(
        &self,
        params: &AssetParameters,
        end_date: NaiveDate,
    ) -> Result<AssetBacktest, CompassError> {
        let series = generate_series(params, self.days, end_date)?;
        Ok(self.run_series(&params.name, &series))
    }

    /// Backtest every catalog asset, skipping failures, and rank the
    /// survivors by realized return.
    pub fn run_catalog(&self, catalog: &Catalog, end_date: NaiveDate) -> BacktestSummary {
        info!(
            assets = catalog.len(),
            days = self.days,
            short_window = self.short_window,
            long_window = self.long_window,
            "starting catalog backtest"
        );

        let mut results = Vec::with_capacity(catalog.len());
        for params in catalog.iter() {
            match self.run_asset(params, end_date) {
                Ok(result) => results.push(result),
                Err(e) => warn!(asset = %params.name, error = %e, "skipping asset"),
            }
        }

        results.sort_by(|a, b| {
            b.profit_pct
                .partial_cmp(&a.profit_pct)
                .unwrap_or(Ordering::Equal)
        });

        let total_initial: f64 = results.iter().map(|r| r.initial_capital).sum();
        let total_final: f64 = results.iter().map(|r| r.final_value).sum();
        let total_trades: usize = results.iter().map(|r| r.trades.len()).sum();
        let total_return_pct = if total_initial > 0.0 {
            (total_final - total_initial) / total_initial * 100.0
        } else {
            0.0
        };
        let average_return_pct = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.profit_pct).sum::<f64>() / results.len() as f64
        };

        if let Some(best) = results.first() {
            info!(
                ranked = results.len(),
                best = %best.asset,
                best_return_pct = best.profit_pct,
                total_trades,
                "catalog backtest complete"
            );
        }

        BacktestSummary {
            results,
            total_initial,
            total_final,
            total_return_pct,
            average_return_pct,
            total_trades,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

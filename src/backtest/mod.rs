//! Historical simulation: synthetic price series, indicators and the
//! golden-cross strategy runner.

pub mod indicators;
pub mod runner;
pub mod series;

pub use indicators::moving_averages;
pub use runner::{AssetBacktest, Backtester, BacktestSummary, ExecutedTrade, LedgerRow, Signal};
pub use series::{generate_series, PricePoint};

//! Position sizing: allocation percentages in, capped dollar orders out.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::PortfolioConfig;
use crate::types::{CompassError, RankedRecommendation};

// ---------------------------------------------------------------------------
// Planned trades & decision log
// ---------------------------------------------------------------------------

/// A sized buy order derived from one recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTrade {
    pub asset: String,
    pub price: f64,
    /// Notional in dollars after every cap was applied.
    pub amount: f64,
    pub units: f64,
    pub allocation_pct: f64,
}

impl fmt::Display for PlannedTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ${:.2} ({:.6} units @ ${}, {:.1}% allocation)",
            self.asset, self.amount, self.units, self.price, self.allocation_pct,
        )
    }
}

/// Record of every sizing decision, kept so passed-over recommendations
/// stay visible alongside the approved ones.
#[derive(Debug, Clone)]
pub enum TradeDecision {
    /// Order sized and approved.
    Planned(PlannedTrade),
    /// Sized amount fell below the minimum trade size.
    BelowMinimum { asset: String, amount: f64 },
    /// The cycle's volume budget is spent.
    VolumeExhausted { asset: String },
    /// Already planning the maximum number of positions.
    PositionLimitReached { asset: String },
}

impl fmt::Display for TradeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDecision::Planned(trade) => write!(f, "PLAN {trade}"),
            TradeDecision::BelowMinimum { asset, amount } => {
                write!(f, "SKIP {asset}: ${amount:.2} below minimum trade size")
            }
            TradeDecision::VolumeExhausted { asset } => {
                write!(f, "SKIP {asset}: volume budget exhausted")
            }
            TradeDecision::PositionLimitReached { asset } => {
                write!(f, "SKIP {asset}: position limit reached")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Turns ranked allocations into orders while enforcing the portfolio
/// limits. Tracks the volume spent during the current cycle; call
/// `reset_cycle` before reusing it for a fresh pass.
pub struct TradePlanner {
    capital: f64,
    max_position_size: f64,
    max_daily_volume: f64,
    min_trade_size: f64,
    max_positions: usize,
    volume_used: f64,
}

impl TradePlanner {
    pub fn new(cfg: &PortfolioConfig) -> Result<Self, CompassError> {
        let invalid = |message: &str| Err(CompassError::InvalidSetting(message.to_string()));

        if !cfg.capital.is_finite() || cfg.capital <= 0.0 {
            return invalid("portfolio capital must be positive");
        }
        if !cfg.max_position_size.is_finite() || cfg.max_position_size <= 0.0 {
            return invalid("max_position_size must be positive");
        }
        if !cfg.max_daily_volume.is_finite() || cfg.max_daily_volume <= 0.0 {
            return invalid("max_daily_volume must be positive");
        }
        if !cfg.min_trade_size.is_finite() || cfg.min_trade_size < 0.0 {
            return invalid("min_trade_size must be non-negative");
        }
        if cfg.max_positions == 0 {
            return invalid("max_positions must be at least 1");
        }

        Ok(Self {
            capital: cfg.capital,
            max_position_size: cfg.max_position_size,
            max_daily_volume: cfg.max_daily_volume,
            min_trade_size: cfg.min_trade_size,
            max_positions: cfg.max_positions,
            volume_used: 0.0,
        })
    }

    pub fn volume_used(&self) -> f64 {
        self.volume_used
    }

    pub fn remaining_volume(&self) -> f64 {
        (self.max_daily_volume - self.volume_used).max(0.0)
    }

    /// Start a fresh cycle with the full volume budget.
    pub fn reset_cycle(&mut self) {
        self.volume_used = 0.0;
    }

    /// Dollar size for one allocation: the target share of capital,
    /// capped by the per-position limit and the remaining volume budget.
    /// Returns zero when the capped amount falls below the minimum.
    pub fn position_size(&self, allocation_pct: f64) -> f64 {
        let base = self.capital * allocation_pct / 100.0;
        let size = base.min(self.max_position_size).min(self.remaining_volume());
        if size < self.min_trade_size {
            0.0
        } else {
            size
        }
    }

    /// Size the ranked recommendations in order, spending the volume
    /// budget on the best-ranked assets first.
    ///
    /// Returns the approved orders and the full decision log.
    pub fn plan(
        &mut self,
        recommendations: &[RankedRecommendation],
    ) -> (Vec<PlannedTrade>, Vec<TradeDecision>) {
        let mut planned: Vec<PlannedTrade> = Vec::new();
        let mut decisions: Vec<TradeDecision> = Vec::new();

        for rec in recommendations {
            let asset = rec.asset.name.clone();

            if planned.len() >= self.max_positions {
                debug!(asset = %asset, "position limit reached");
                decisions.push(TradeDecision::PositionLimitReached { asset });
                continue;
            }

            let amount = self.position_size(rec.allocation_pct);
            if amount <= 0.0 {
                if self.remaining_volume() < self.min_trade_size {
                    warn!(asset = %asset, "volume budget exhausted");
                    decisions.push(TradeDecision::VolumeExhausted { asset });
                } else {
                    let attempted = self.capital * rec.allocation_pct / 100.0;
                    debug!(asset = %asset, amount = attempted, "below minimum trade size");
                    decisions.push(TradeDecision::BelowMinimum {
                        asset,
                        amount: attempted,
                    });
                }
                continue;
            }

            let trade = PlannedTrade {
                asset,
                price: rec.asset.initial_price,
                amount,
                units: amount / rec.asset.initial_price,
                allocation_pct: rec.allocation_pct,
            };
            self.volume_used += amount;
            info!(
                asset = %trade.asset,
                amount = format!("${:.2}", trade.amount),
                units = trade.units,
                rank = rec.rank,
                "trade planned"
            );
            decisions.push(TradeDecision::Planned(trade.clone()));
            planned.push(trade);
        }

        info!(
            planned = planned.len(),
            candidates = recommendations.len(),
            volume_used = format!("${:.2}", self.volume_used),
            "sizing pass complete"
        );

        (planned, decisions)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

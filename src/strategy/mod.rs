//! Trade planning: allocation percentages into sized, limit-checked
//! orders.

pub mod sizing;

pub use sizing::{PlannedTrade, TradeDecision, TradePlanner};

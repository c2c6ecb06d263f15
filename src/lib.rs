//! COMPASS — Monte Carlo Crypto Analysis Engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod catalog;
pub mod sim;
pub mod score;
pub mod engine;
pub mod strategy;
pub mod backtest;
pub mod storage;

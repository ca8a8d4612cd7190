//! # Simfolio AI
//!
//! Analysis adapter boundary for the simfolio tracker. Builds the fixed
//! two-part prompt from a symbol and its quote, sends it to the external
//! text-generation service in real mode, and normalizes the reply into a
//! [`MarketAnalysis`]. The mock path composes the report locally and the
//! real path degrades to a canned fallback, so callers always receive a
//! populated analysis.

mod analyst;

pub use analyst::{MarketAnalysis, StockAnalyst};

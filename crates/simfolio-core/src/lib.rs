//! # Simfolio Core
//!
//! Market data contracts, simulators and the gateway for the simfolio
//! portfolio tracker.
//!
//! ## Overview
//!
//! - **Canonical domain models** for candles, quotes, symbols and ranges
//! - **`MarketDataSource` trait** with exactly two implementations: the
//!   Finnhub client and the simulator
//! - **Market data gateway** applying the silent fallback-on-failure policy
//! - **HTTP client abstraction** so adapters stay testable offline
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | External provider adapters (Finnhub) |
//! | [`data_source`] | Source trait, request types, structured errors |
//! | [`domain`] | Domain models (Candle, Quote, Symbol, TimeRange) |
//! | [`error`] | Core error types |
//! | [`gateway`] | Mode selection, fallback policy, result envelope |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`sim`] | Candle and quote simulators |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use simfolio_core::{DataMode, MarketDataGateway, Symbol, TimeRange};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = MarketDataGateway::builder()
//!         .with_mode(DataMode::Real)
//!         .with_env_credential()
//!         .build();
//!
//!     let symbol = Symbol::parse("AAPL").unwrap();
//!     let candles = gateway.candles(&symbol, TimeRange::Month).await;
//!     println!("{} candles via {}", candles.data.len(), candles.origin);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Gateway calls never fail: transport and malformed-response errors from the
//! real provider are absorbed and replaced with simulated data, and the
//! [`Sourced`] envelope records which path served the result. Construction of
//! domain values returns [`ValidationError`] instead of panicking.

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod sim;

// Re-export commonly used types at crate root for convenience

pub use adapters::FinnhubAdapter;

pub use data_source::{
    CandlesRequest, MarketDataSource, QuoteRequest, SourceError, SourceErrorKind, SourceId,
};

pub use domain::{Candle, CandleSeries, Quote, Symbol, TimeRange, UtcDateTime};

pub use error::{CoreError, ValidationError};

pub use gateway::{DataMode, DataOrigin, GatewayBuilder, MarketDataGateway, Sourced};

pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

pub use sim::{CandleSimulator, QuoteSimulator, SimulatedSource};

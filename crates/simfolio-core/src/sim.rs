//! Synthetic market data generators.
//!
//! [`CandleSimulator`] produces a price-path series: each candle opens at the
//! previous close and drifts by a bounded random step, which yields visually
//! plausible trends rather than independent noise. [`QuoteSimulator`] produces
//! a single randomized quote. [`SimulatedSource`] wraps both behind the
//! [`MarketDataSource`] trait so the gateway can treat simulation as just
//! another source.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use time::Duration as TimeDuration;

use crate::data_source::{CandlesRequest, MarketDataSource, QuoteRequest, SourceError, SourceId};
use crate::{Candle, CandleSeries, Quote, Symbol, TimeRange, UtcDateTime};

const DEFAULT_SEED_PRICE: f64 = 100.0;
const VOLATILITY_RATIO: f64 = 0.02;
const MIN_VOLUME: u64 = 50_000;
const VOLUME_SPREAD: u64 = 1_000_000;

/// Randomized price-path candle generator.
#[derive(Debug, Clone)]
pub struct CandleSimulator {
    step: TimeDuration,
}

impl Default for CandleSimulator {
    fn default() -> Self {
        Self {
            step: TimeDuration::days(1),
        }
    }
}

impl CandleSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting price for a symbol. A few well-known tickers get distinct
    /// seeds so switching symbols visibly changes the chart.
    pub fn seed_price(symbol: &Symbol) -> f64 {
        match symbol.as_str() {
            "AAPL" => 150.0,
            "TSLA" => 200.0,
            _ => DEFAULT_SEED_PRICE,
        }
    }

    pub fn generate(&self, symbol: &Symbol, range: TimeRange) -> CandleSeries {
        self.generate_from(symbol, range, Self::seed_price(symbol))
    }

    /// Walk `range.candle_count()` steps backward from now, one candle per
    /// step, each opening at the previous (unrounded) close.
    pub fn generate_from(
        &self,
        symbol: &Symbol,
        range: TimeRange,
        start_price: f64,
    ) -> CandleSeries {
        let count = range.candle_count();
        let now = UtcDateTime::now().into_inner();
        let mut price = start_price;
        let mut candles = Vec::with_capacity(count);

        for back in (1..=count).rev() {
            let ts = UtcDateTime::from_offset_datetime(now - self.step * back as i32)
                .expect("offsets from a UTC instant stay UTC");

            let open = price;
            let volatility = open * VOLATILITY_RATIO;
            let change = (fastrand::f64() - 0.5) * volatility;
            let close = open + change;
            let high = open.max(close) + fastrand::f64() * volatility * 0.5;
            let low = open.min(close) - fastrand::f64() * volatility * 0.5;
            let volume = MIN_VOLUME + fastrand::u64(0..VOLUME_SPREAD);

            let candle = Candle::new(
                ts,
                round2(open),
                round2(high),
                round2(low),
                round2(close),
                volume,
            )
            .expect("simulated candles satisfy the OHLC bounds by construction");
            candles.push(candle);

            price = close;
        }

        CandleSeries::new(symbol.clone(), range, candles)
    }
}

/// Randomized single-point quote generator.
///
/// `change` and `change_percent` are sampled independently of the price
/// fields instead of being derived from `current - previous_close`.
/// Consumers of simulated quotes must only rely on the sign of `change`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteSimulator;

impl QuoteSimulator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> Quote {
        let base = 150.0 + fastrand::f64() * 10.0;
        Quote::new(
            round2(base),
            round2(fastrand::f64() * 5.0),
            round2(fastrand::f64() * 2.0),
            round2(base + 2.0),
            round2(base - 2.0),
            round2(base - 1.0),
            round2(base - 1.5),
        )
        .expect("simulated quote prices are positive by construction")
    }
}

/// [`MarketDataSource`] implementation backed by the simulators.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    candles: CandleSimulator,
    quotes: QuoteSimulator,
    latency: Option<Duration>,
}

impl SimulatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artificial delay before each response, for UI pacing.
    /// Off by default so tests stay fast.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn simulate_candles(&self, symbol: &Symbol, range: TimeRange) -> CandleSeries {
        self.pause().await;
        self.candles.generate(symbol, range)
    }

    pub async fn simulate_quote(&self) -> Quote {
        self.pause().await;
        self.quotes.generate()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl MarketDataSource for SimulatedSource {
    fn id(&self) -> SourceId {
        SourceId::Simulator
    }

    fn candles<'a>(
        &'a self,
        req: CandlesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CandleSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.simulate_candles(&req.symbol, req.range).await) })
    }

    fn quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, SourceError>> + Send + 'a>> {
        let _ = req;
        Box::pin(async move { Ok(self.simulate_quote().await) })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

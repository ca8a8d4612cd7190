//! Market data gateway: the single entry point candle/quote consumers call.
//!
//! The gateway selects a [`MarketDataSource`] once, at construction. In real
//! mode with a credential it holds a Finnhub adapter; otherwise it holds no
//! real source at all. Every call that cannot be served by the real source,
//! whether it failed, returned nothing, or was never configured, is served by
//! the simulator instead. Callers therefore never see an error, only a
//! [`Sourced`] envelope that records which path produced the data.

use std::env;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::FinnhubAdapter;
use crate::data_source::{CandlesRequest, MarketDataSource, QuoteRequest};
use crate::sim::SimulatedSource;
use crate::{CandleSeries, Quote, Symbol, TimeRange, ValidationError};

const ENV_CREDENTIAL: &str = "SIMFOLIO_FINNHUB_API_KEY";
const ENV_CREDENTIAL_FALLBACK: &str = "FINNHUB_API_KEY";

/// Process-wide flag selecting real external services versus simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Real,
    Mock,
}

impl DataMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Mock => "mock",
        }
    }
}

impl Display for DataMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "real" => Ok(Self::Real),
            "mock" => Ok(Self::Mock),
            other => Err(ValidationError::InvalidDataMode {
                value: other.to_owned(),
            }),
        }
    }
}

/// Which path actually produced a gateway result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Real,
    Simulated,
}

impl DataOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Simulated => "simulated",
        }
    }
}

impl Display for DataOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway result envelope.
///
/// `warnings` describe real-source failures the gateway absorbed on the way
/// to this result; they are diagnostics, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub data: T,
    pub origin: DataOrigin,
    pub warnings: Vec<String>,
}

impl<T> Sourced<T> {
    fn real(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Real,
            warnings: Vec::new(),
        }
    }

    fn simulated(data: T, warnings: Vec<String>) -> Self {
        Self {
            data,
            origin: DataOrigin::Simulated,
            warnings,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.origin == DataOrigin::Simulated
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Builder configuring mode and credential before gateway construction.
#[derive(Debug, Default, Clone)]
pub struct GatewayBuilder {
    mode: Option<DataMode>,
    credential: Option<String>,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: DataMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Read the credential from `SIMFOLIO_FINNHUB_API_KEY`, falling back to
    /// `FINNHUB_API_KEY`. An explicit [`with_credential`] wins.
    ///
    /// [`with_credential`]: GatewayBuilder::with_credential
    pub fn with_env_credential(mut self) -> Self {
        if self.credential.is_none() {
            self.credential = env::var(ENV_CREDENTIAL)
                .or_else(|_| env::var(ENV_CREDENTIAL_FALLBACK))
                .ok();
        }
        self
    }

    pub fn build(self) -> MarketDataGateway {
        let mode = self.mode.unwrap_or(DataMode::Mock);
        let real: Option<Arc<dyn MarketDataSource>> = match (mode, self.credential) {
            (DataMode::Real, Some(token)) if !token.trim().is_empty() => {
                Some(Arc::new(FinnhubAdapter::new(token)))
            }
            _ => None,
        };

        MarketDataGateway {
            real,
            simulator: SimulatedSource::new(),
        }
    }
}

/// Mode-aware facade over the real client and the simulators.
pub struct MarketDataGateway {
    real: Option<Arc<dyn MarketDataSource>>,
    simulator: SimulatedSource,
}

impl MarketDataGateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Gateway that never touches the network.
    pub fn simulated() -> Self {
        Self {
            real: None,
            simulator: SimulatedSource::new(),
        }
    }

    /// Gateway with an injected real source; used by tests to exercise the
    /// fallback policy without network access.
    pub fn with_real_source(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            real: Some(source),
            simulator: SimulatedSource::new(),
        }
    }

    /// Fetch candles for a symbol over a range. Infallible: a failing or
    /// empty real fetch falls back to a simulated series seeded from the
    /// symbol, and the envelope records the substitution.
    pub async fn candles(&self, symbol: &Symbol, range: TimeRange) -> Sourced<CandleSeries> {
        let mut warnings = Vec::new();

        if let Some(real) = &self.real {
            let request = CandlesRequest::new(symbol.clone(), range);
            match real.candles(request).await {
                Ok(series) if !series.is_empty() => return Sourced::real(series),
                Ok(_) => warnings.push(format!(
                    "source '{}' returned no candles for {symbol}; serving simulated data",
                    real.id()
                )),
                Err(error) => warnings.push(format!(
                    "source '{}' failed: {error}; serving simulated data",
                    real.id()
                )),
            }
        }

        Sourced::simulated(self.simulator.simulate_candles(symbol, range).await, warnings)
    }

    /// Fetch a quote for a symbol. Infallible under the same policy as
    /// [`candles`](MarketDataGateway::candles).
    pub async fn quote(&self, symbol: &Symbol) -> Sourced<Quote> {
        let mut warnings = Vec::new();

        if let Some(real) = &self.real {
            let request = QuoteRequest::new(symbol.clone());
            match real.quote(request).await {
                Ok(quote) => return Sourced::real(quote),
                Err(error) => warnings.push(format!(
                    "source '{}' failed: {error}; serving simulated quote",
                    real.id()
                )),
            }
        }

        Sourced::simulated(self.simulator.simulate_quote().await, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{SourceError, SourceId};
    use std::future::Future;
    use std::pin::Pin;

    struct FailingSource;

    impl MarketDataSource for FailingSource {
        fn id(&self) -> SourceId {
            SourceId::Finnhub
        }

        fn candles<'a>(
            &'a self,
            _req: CandlesRequest,
        ) -> Pin<Box<dyn Future<Output = Result<CandleSeries, SourceError>> + Send + 'a>> {
            Box::pin(async { Err(SourceError::unavailable("network unreachable")) })
        }

        fn quote<'a>(
            &'a self,
            _req: QuoteRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Quote, SourceError>> + Send + 'a>> {
            Box::pin(async { Err(SourceError::unavailable("network unreachable")) })
        }
    }

    struct EmptySource;

    impl MarketDataSource for EmptySource {
        fn id(&self) -> SourceId {
            SourceId::Finnhub
        }

        fn candles<'a>(
            &'a self,
            req: CandlesRequest,
        ) -> Pin<Box<dyn Future<Output = Result<CandleSeries, SourceError>> + Send + 'a>> {
            Box::pin(async move { Ok(CandleSeries::new(req.symbol, req.range, Vec::new())) })
        }

        fn quote<'a>(
            &'a self,
            _req: QuoteRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Quote, SourceError>> + Send + 'a>> {
            Box::pin(async { Err(SourceError::malformed_response("no current price")) })
        }
    }

    fn symbol(input: &str) -> Symbol {
        Symbol::parse(input).expect("valid symbol")
    }

    #[tokio::test]
    async fn mock_mode_serves_simulated_data_without_warnings() {
        let gateway = MarketDataGateway::builder().with_mode(DataMode::Mock).build();

        let result = gateway.candles(&symbol("AAPL"), TimeRange::Month).await;
        assert_eq!(result.origin, DataOrigin::Simulated);
        assert!(result.warnings.is_empty());
        assert_eq!(result.data.len(), 30);
    }

    #[tokio::test]
    async fn real_mode_without_credential_stays_simulated() {
        let gateway = MarketDataGateway::builder().with_mode(DataMode::Real).build();

        let result = gateway.quote(&symbol("AAPL")).await;
        assert!(result.is_simulated());
    }

    #[tokio::test]
    async fn transport_failure_falls_back_with_warning() {
        let gateway = MarketDataGateway::with_real_source(Arc::new(FailingSource));

        let result = gateway.candles(&symbol("TSLA"), TimeRange::Year).await;
        assert_eq!(result.origin, DataOrigin::Simulated);
        assert_eq!(result.data.len(), 100);
        assert!(result.data.is_chronological());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("finnhub"));
    }

    #[tokio::test]
    async fn empty_real_series_falls_back() {
        let gateway = MarketDataGateway::with_real_source(Arc::new(EmptySource));

        let result = gateway.candles(&symbol("MSFT"), TimeRange::Intraday).await;
        assert!(result.is_simulated());
        assert_eq!(result.data.len(), 24);
        assert!(result.warnings[0].contains("no candles"));
    }

    #[tokio::test]
    async fn quote_fallback_always_yields_valid_quote() {
        let gateway = MarketDataGateway::with_real_source(Arc::new(EmptySource));

        let result = gateway.quote(&symbol("MSFT")).await;
        assert!(result.is_simulated());
        assert!(result.data.current > 0.0);
    }
}

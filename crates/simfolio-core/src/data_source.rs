//! Market data source trait and request types.
//!
//! [`MarketDataSource`] is the single seam between the gateway and whatever
//! produces candles and quotes. Exactly two implementations exist: the
//! Finnhub adapter for real data and [`crate::sim::SimulatedSource`] for
//! synthetic data. The gateway picks one at construction time and never
//! re-checks the mode per call.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CandleSeries, Quote, Symbol, TimeRange, ValidationError};

/// Identifies which implementation produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Finnhub,
    Simulator,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finnhub => "finnhub",
            Self::Simulator => "simulator",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "finnhub" => Ok(Self::Finnhub),
            "simulator" => Ok(Self::Simulator),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    MalformedResponse,
    InvalidRequest,
    Internal,
}

/// Structured source error consumed by the gateway fallback policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for candle endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandlesRequest {
    pub symbol: Symbol,
    pub range: TimeRange,
}

impl CandlesRequest {
    pub fn new(symbol: Symbol, range: TimeRange) -> Self {
        Self { symbol, range }
    }
}

/// Request payload for quote endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: Symbol,
}

impl QuoteRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Source contract implemented by the real client and the simulator.
///
/// Implementations must be `Send + Sync`; methods return boxed futures so the
/// trait stays object-safe behind `Arc<dyn MarketDataSource>`.
pub trait MarketDataSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// Fetch a candle series for the requested symbol and range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, a non-success upstream
    /// status, or a payload that does not translate into valid [`CandleSeries`]
    /// data. The gateway absorbs these and falls back to simulation.
    fn candles<'a>(
        &'a self,
        req: CandlesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CandleSeries, SourceError>> + Send + 'a>>;

    /// Fetch a single quote for the requested symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure or a payload missing the
    /// current-price field. The gateway absorbs these and falls back.
    fn quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_round_trips_through_str() {
        for id in [SourceId::Finnhub, SourceId::Simulator] {
            let parsed = SourceId::from_str(id.as_str()).expect("must parse");
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn error_codes_follow_kind() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(
            SourceError::malformed_response("x").code(),
            "source.malformed_response"
        );
        assert!(SourceError::unavailable("x").retryable());
        assert!(!SourceError::malformed_response("x").retryable());
    }
}

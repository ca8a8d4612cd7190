use serde::{Deserialize, Serialize};

use crate::{Symbol, TimeRange, UtcDateTime, ValidationError};

/// Single OHLCV candle.
///
/// Construction enforces the chart invariants: all prices finite and
/// non-negative, `low <= min(open, close)` and `high >= max(open, close)`.
/// The `date_label` is derived from `ts` so chart consumers never format
/// timestamps themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub date_label: String,
}

impl Candle {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidCandleRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidCandleBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
            date_label: ts.date_label(),
        })
    }
}

/// Series wrapper returned by candle endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub symbol: Symbol,
    pub range: TimeRange,
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(symbol: Symbol, range: TimeRange, candles: Vec<Candle>) -> Self {
        Self {
            symbol,
            range,
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// True when timestamps strictly increase (no duplicates, no reordering).
    pub fn is_chronological(&self) -> bool {
        self.candles
            .windows(2)
            .all(|pair| pair[0].ts < pair[1].ts)
    }
}

/// Single-point market quote.
///
/// For real data `change = current - previous_close` holds within provider
/// rounding. The simulated path intentionally randomizes `change` and
/// `change_percent` independently of the price fields, so that relation is
/// NOT enforced here, see [`crate::sim::QuoteSimulator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
}

impl Quote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        current: f64,
        change: f64,
        change_percent: f64,
        high: f64,
        low: f64,
        open: f64,
        previous_close: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("current", current)?;
        validate_finite("change", change)?;
        validate_finite("change_percent", change_percent)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("open", open)?;
        validate_non_negative("previous_close", previous_close)?;

        Ok(Self {
            current,
            change,
            change_percent,
            high,
            low,
            open,
            previous_close,
        })
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

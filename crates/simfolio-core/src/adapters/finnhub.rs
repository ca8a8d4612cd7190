use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{
    CandlesRequest, MarketDataSource, QuoteRequest, SourceError, SourceId,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{Candle, CandleSeries, Quote, TimeRange, UtcDateTime};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Finnhub market data client.
///
/// Pure translation from the Finnhub wire format into the domain model; all
/// failures surface as [`SourceError`] for the gateway to absorb.
#[derive(Clone)]
pub struct FinnhubAdapter {
    http_client: Arc<dyn HttpClient>,
    token: String,
    base_url: String,
}

impl FinnhubAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), token)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
            base_url: String::from(BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Finnhub resolution code for a chart range.
    const fn resolution(range: TimeRange) -> &'static str {
        match range {
            TimeRange::Intraday => "15",
            TimeRange::Month => "60",
            TimeRange::Year => "D",
        }
    }

    /// Lookback window in seconds for a chart range. Intraday requests two
    /// days so the window still holds data right after a market open.
    const fn lookback_seconds(range: TimeRange) -> i64 {
        match range {
            TimeRange::Intraday => 2 * 86_400,
            TimeRange::Month => 30 * 86_400,
            TimeRange::Year => 365 * 86_400,
        }
    }

    async fn fetch_candles(&self, req: &CandlesRequest) -> Result<CandleSeries, SourceError> {
        let to = UtcDateTime::now().unix_seconds();
        let from = to - Self::lookback_seconds(req.range);
        let url = format!(
            "{}/stock/candle?symbol={}&resolution={}&from={}&to={}&token={}",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            Self::resolution(req.range),
            from,
            to,
            urlencoding::encode(&self.token)
        );

        let response = self.execute(url).await?;
        let payload: CandleResponse = serde_json::from_str(&response.body).map_err(|error| {
            SourceError::malformed_response(format!("finnhub candle payload did not parse: {error}"))
        })?;

        if payload.status != "ok" {
            return Err(SourceError::unavailable(format!(
                "finnhub candle status '{}'",
                payload.status
            )));
        }

        let len = payload.timestamps.len();
        let aligned = payload.opens.len() == len
            && payload.highs.len() == len
            && payload.lows.len() == len
            && payload.closes.len() == len
            && payload.volumes.len() == len;
        if !aligned {
            return Err(SourceError::malformed_response(
                "finnhub candle arrays have mismatched lengths",
            ));
        }

        let mut candles = Vec::with_capacity(len);
        for index in 0..len {
            let ts = UtcDateTime::from_unix_seconds(payload.timestamps[index]).map_err(|error| {
                SourceError::malformed_response(format!("finnhub candle timestamp: {error}"))
            })?;

            // Skip bars the upstream reports with inconsistent bounds rather
            // than failing the whole series.
            if let Ok(candle) = Candle::new(
                ts,
                payload.opens[index],
                payload.highs[index],
                payload.lows[index],
                payload.closes[index],
                payload.volumes[index].max(0.0) as u64,
            ) {
                candles.push(candle);
            }
        }

        Ok(CandleSeries::new(req.symbol.clone(), req.range, candles))
    }

    async fn fetch_quote(&self, req: &QuoteRequest) -> Result<Quote, SourceError> {
        let url = format!(
            "{}/quote?symbol={}&token={}",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            urlencoding::encode(&self.token)
        );

        let response = self.execute(url).await?;
        let payload: QuoteResponse = serde_json::from_str(&response.body).map_err(|error| {
            SourceError::malformed_response(format!("finnhub quote payload did not parse: {error}"))
        })?;

        // Finnhub reports unknown symbols as an all-zero payload, so a zero
        // current price counts as missing.
        let current = payload
            .current
            .filter(|price| *price != 0.0)
            .ok_or_else(|| {
                SourceError::malformed_response("finnhub quote is missing a current price")
            })?;

        Quote::new(
            current,
            require_field(payload.change, "d")?,
            require_field(payload.change_percent, "dp")?,
            require_field(payload.high, "h")?,
            require_field(payload.low, "l")?,
            require_field(payload.open, "o")?,
            require_field(payload.previous_close, "pc")?,
        )
        .map_err(|error| SourceError::malformed_response(format!("finnhub quote: {error}")))
    }

    async fn execute(&self, url: String) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(url).with_timeout_ms(REQUEST_TIMEOUT_MS);
        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("finnhub transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "finnhub returned status {}",
                response.status
            )));
        }

        Ok(response)
    }
}

impl MarketDataSource for FinnhubAdapter {
    fn id(&self) -> SourceId {
        SourceId::Finnhub
    }

    fn candles<'a>(
        &'a self,
        req: CandlesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CandleSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_candles(&req).await })
    }

    fn quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_quote(&req).await })
    }
}

fn require_field(value: Option<f64>, name: &'static str) -> Result<f64, SourceError> {
    value.ok_or_else(|| {
        SourceError::malformed_response(format!("finnhub quote is missing field '{name}'"))
    })
}

/// Wire format of `GET /stock/candle`. Arrays are absent on error responses,
/// hence the defaults.
#[derive(Debug, Clone, Deserialize)]
struct CandleResponse {
    #[serde(rename = "s")]
    status: String,
    #[serde(rename = "t", default)]
    timestamps: Vec<i64>,
    #[serde(rename = "o", default)]
    opens: Vec<f64>,
    #[serde(rename = "h", default)]
    highs: Vec<f64>,
    #[serde(rename = "l", default)]
    lows: Vec<f64>,
    #[serde(rename = "c", default)]
    closes: Vec<f64>,
    #[serde(rename = "v", default)]
    volumes: Vec<f64>,
}

/// Wire format of `GET /quote`.
#[derive(Debug, Clone, Copy, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "c")]
    current: Option<f64>,
    #[serde(rename = "d")]
    change: Option<f64>,
    #[serde(rename = "dp")]
    change_percent: Option<f64>,
    #[serde(rename = "h")]
    high: Option<f64>,
    #[serde(rename = "l")]
    low: Option<f64>,
    #[serde(rename = "o")]
    open: Option<f64>,
    #[serde(rename = "pc")]
    previous_close: Option<f64>,
}

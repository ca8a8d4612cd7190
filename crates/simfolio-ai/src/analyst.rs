use std::sync::Arc;

use serde::{Deserialize, Serialize};
use simfolio_core::{
    DataMode, HttpClient, HttpRequest, Quote, ReqwestHttpClient, SourceError, Symbol,
};

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Two-field natural-language market report. Ephemeral: regenerated per
/// request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub symbol: Symbol,
    pub summary: String,
    pub recommendation: String,
}

/// Analysis adapter over the external text-generation service.
///
/// The adapter never propagates an error: the real path substitutes a canned
/// service-unavailable report on any failure, and the mock path composes its
/// report locally from the quote.
#[derive(Clone)]
pub struct StockAnalyst {
    mode: DataMode,
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    locale: String,
}

impl StockAnalyst {
    pub fn new(mode: DataMode, api_key: Option<String>) -> Self {
        Self::with_http_client(mode, api_key, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(
        mode: DataMode,
        api_key: Option<String>,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            mode,
            http_client,
            api_key,
            locale: String::from("en-US"),
        }
    }

    /// Locale the model is asked to answer in.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Produce a market analysis for the symbol and its current quote.
    ///
    /// Real mode with a key calls the text-generation service and falls back
    /// to the canned report on any transport failure or empty candidate
    /// text. Real mode without a key, and mock mode, compose the templated
    /// report locally.
    pub async fn analyze(&self, symbol: &Symbol, quote: &Quote) -> MarketAnalysis {
        if self.mode == DataMode::Real {
            if let Some(key) = &self.api_key {
                return self
                    .request_analysis(symbol, quote, key)
                    .await
                    .unwrap_or_else(|_| Self::fallback_analysis(symbol));
            }
        }

        self.mock_analysis(symbol, quote)
    }

    async fn request_analysis(
        &self,
        symbol: &Symbol,
        quote: &Quote,
        key: &str,
    ) -> Result<MarketAnalysis, SourceError> {
        let prompt = self.build_prompt(symbol, quote);
        let body = serde_json::to_string(&GenerateContentRequest::single_turn(&prompt))
            .map_err(|error| SourceError::internal(format!("prompt serialization: {error}")))?;

        let url = format!("{GENERATE_URL}?key={}", urlencoding::encode(key));
        let request = HttpRequest::post(url)
            .with_header("content-type", "application/json")
            .with_body(body)
            .with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("text generation transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "text generation returned status {}",
                response.status
            )));
        }

        let payload: GenerateContentResponse =
            serde_json::from_str(&response.body).map_err(|error| {
                SourceError::malformed_response(format!(
                    "text generation payload did not parse: {error}"
                ))
            })?;

        let text = payload.first_text().ok_or_else(|| {
            SourceError::malformed_response("text generation response carried no candidate text")
        })?;

        Ok(MarketAnalysis {
            symbol: symbol.clone(),
            summary: text.trim().to_owned(),
            recommendation: String::from("Based on AI analysis."),
        })
    }

    fn build_prompt(&self, symbol: &Symbol, quote: &Quote) -> String {
        format!(
            "You are a professional financial investment advisor. Based on the stock data \
             below, give a brief investment analysis.\n\
             Symbol: {symbol}\n\
             Current price: {:.2}\n\
             Today's change: {:.2} ({:.2}%)\n\n\
             Answer in two parts:\n\
             1. Market summary\n\
             2. Actionable recommendation\n\n\
             Respond in plain text only, no markdown, no bold, no headings. Answer in the \
             {} locale and keep the whole response under 150 characters.",
            quote.current, quote.change, quote.change_percent, self.locale
        )
    }

    /// Local report keyed on the sign of the day's change: non-negative reads
    /// bullish, negative reads bearish.
    fn mock_analysis(&self, symbol: &Symbol, quote: &Quote) -> MarketAnalysis {
        let (trend, recommendation) = if quote.change >= 0.0 {
            (
                "a bullish upward trend",
                "Consider holding and watch the resistance overhead.",
            )
        } else {
            (
                "a bearish correction",
                "Consider staying on the sidelines until a bottom signal is confirmed.",
            )
        };

        MarketAnalysis {
            symbol: symbol.clone(),
            summary: format!(
                "[Simulated] {symbol} shows {trend}, moving {:.2}% today. Short-term moving \
                 averages show firm support and volume holds steady.",
                quote.change_percent
            ),
            recommendation: String::from(recommendation),
        }
    }

    fn fallback_analysis(symbol: &Symbol) -> MarketAnalysis {
        MarketAnalysis {
            symbol: symbol.clone(),
            summary: String::from(
                "The AI analysis service is currently unavailable. Check the API key or \
                 network connection.",
            ),
            recommendation: String::from("No recommendation at this time."),
        }
    }
}

/// Wire format of the text-generation request: one single-turn prompt.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn single_turn(text: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Wire format of the text-generation response, reduced to the candidate
/// text this adapter reads.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use simfolio_core::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;

    #[derive(Debug)]
    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn symbol(input: &str) -> Symbol {
        Symbol::parse(input).expect("valid symbol")
    }

    fn quote_with_change(change: f64) -> Quote {
        Quote::new(155.0, change, change / 1.55, 157.0, 153.0, 154.0, 153.5)
            .expect("valid quote")
    }

    #[tokio::test]
    async fn mock_path_reads_bullish_on_gain() {
        let analyst = StockAnalyst::new(DataMode::Mock, None);

        let analysis = analyst.analyze(&symbol("AAPL"), &quote_with_change(2.0)).await;

        assert!(analysis.summary.contains("bullish"));
        assert!(!analysis.recommendation.is_empty());
    }

    #[tokio::test]
    async fn mock_path_reads_bearish_on_loss() {
        let analyst = StockAnalyst::new(DataMode::Mock, None);

        let analysis = analyst.analyze(&symbol("AAPL"), &quote_with_change(-2.0)).await;

        assert!(analysis.summary.contains("bearish"));
    }

    #[tokio::test]
    async fn real_mode_without_key_uses_mock_path() {
        let analyst = StockAnalyst::new(DataMode::Real, None);

        let analysis = analyst.analyze(&symbol("TSLA"), &quote_with_change(1.0)).await;

        assert!(analysis.summary.starts_with("[Simulated]"));
    }

    #[tokio::test]
    async fn transport_failure_yields_canned_fallback() {
        let client = Arc::new(CannedHttpClient {
            response: Err(HttpError::new("connection refused")),
        });
        let analyst =
            StockAnalyst::with_http_client(DataMode::Real, Some(String::from("key")), client);

        let analysis = analyst.analyze(&symbol("AAPL"), &quote_with_change(1.0)).await;

        assert!(analysis.summary.contains("unavailable"));
        assert_eq!(analysis.recommendation, "No recommendation at this time.");
    }

    #[tokio::test]
    async fn empty_candidate_text_yields_canned_fallback() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#;
        let client = Arc::new(CannedHttpClient {
            response: Ok(HttpResponse::ok_json(body)),
        });
        let analyst =
            StockAnalyst::with_http_client(DataMode::Real, Some(String::from("key")), client);

        let analysis = analyst.analyze(&symbol("AAPL"), &quote_with_change(1.0)).await;

        assert!(analysis.summary.contains("unavailable"));
    }

    #[tokio::test]
    async fn candidate_text_becomes_summary() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Shares look steady; accumulate on dips."}]}}]}"#;
        let client = Arc::new(CannedHttpClient {
            response: Ok(HttpResponse::ok_json(body)),
        });
        let analyst =
            StockAnalyst::with_http_client(DataMode::Real, Some(String::from("key")), client);

        let analysis = analyst.analyze(&symbol("AAPL"), &quote_with_change(1.0)).await;

        assert_eq!(analysis.summary, "Shares look steady; accumulate on dips.");
        assert_eq!(analysis.recommendation, "Based on AI analysis.");
    }

    #[test]
    fn prompt_carries_symbol_quote_and_locale() {
        let analyst = StockAnalyst::new(DataMode::Real, Some(String::from("key")))
            .with_locale("zh-TW");
        let prompt = analyst.build_prompt(&symbol("AAPL"), &quote_with_change(1.5));

        assert!(prompt.contains("Symbol: AAPL"));
        assert!(prompt.contains("155.00"));
        assert!(prompt.contains("zh-TW"));
        assert!(prompt.contains("under 150 characters"));
    }
}

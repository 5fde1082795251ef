use crate::core::{QuoteProvider, RawQuote};
use crate::utils::error::{Result, StockrError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn column<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

// Rows with a null in any column are dropped; adjclose falls back to close.
fn row_at(columns: &QuoteColumns, adjclose: &[Option<f64>], timestamp: i64, i: usize) -> Option<RawQuote> {
    let close = column(&columns.close, i)?;
    Some(RawQuote {
        timestamp,
        open: column(&columns.open, i)?,
        high: column(&columns.high, i)?,
        low: column(&columns.low, i)?,
        close,
        volume: column(&columns.volume, i)?,
        adjclose: column(adjclose, i).unwrap_or(close),
    })
}

impl ChartEnvelope {
    fn into_quotes(self, symbol: &str) -> Result<Vec<RawQuote>> {
        if let Some(error) = self.chart.error {
            return Err(StockrError::ProviderError {
                message: format!("{}: {}", error.code, error.description),
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| StockrError::ProviderError {
                message: format!("empty chart result for {}", symbol),
            })?;

        let Some(columns) = result.indicators.quote.first() else {
            return Ok(Vec::new());
        };
        let adjclose = result
            .indicators
            .adjclose
            .first()
            .map(|column| column.adjclose.as_slice())
            .unwrap_or(&[]);

        let mut skipped = 0usize;
        let mut quotes = Vec::with_capacity(result.timestamp.len());
        for (i, &timestamp) in result.timestamp.iter().enumerate() {
            match row_at(columns, adjclose, timestamp, i) {
                Some(quote) => quotes.push(quote),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} incomplete rows for {}", skipped, symbol);
        }

        Ok(quotes)
    }
}

/// Daily quotes from the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    base_url: String,
    client: Client,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| StockrError::InvalidConfigValueError {
            field: "provider.base_url".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| StockrError::ConfigError {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    async fn fetch_quotes(&self, symbol: &str, interval: &str, range: &str) -> Result<Vec<RawQuote>> {
        let url = self.chart_url(symbol)?;
        tracing::debug!("Making quote request to: {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("interval", interval), ("range", range)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Quote response status: {}", status);
        let body = response.text().await?;

        let parsed = serde_json::from_str::<ChartEnvelope>(&body);
        if !status.is_success() {
            return match parsed {
                Ok(envelope) if envelope.chart.error.is_some() => envelope.into_quotes(symbol),
                _ => Err(StockrError::StatusError {
                    status: status.as_u16(),
                    body,
                }),
            };
        }

        parsed?.into_quotes(symbol)
    }
}

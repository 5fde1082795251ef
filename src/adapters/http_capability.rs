use crate::domain::model::StockAnalysis;
use crate::domain::ports::StockCapability;
use crate::utils::error::{Result, StockrError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

/// Talks to a running stock service over its JSON API.
#[derive(Debug, Clone)]
pub struct HttpCapability {
    base_url: String,
    client: Client,
}

impl HttpCapability {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| StockrError::InvalidConfigValueError {
            field: "server_url".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| StockrError::ConfigError {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str]) -> Result<Response> {
        let url = self.url(segments)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StockrError::StatusError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Succeeds once the service answers its health probe.
    pub async fn health(&self) -> Result<()> {
        self.get(&["health"]).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl StockCapability for HttpCapability {
    async fn fetch_stock_data(&self, symbol: &str) -> Result<StockAnalysis> {
        let analysis = self
            .get(&["stock", symbol])
            .await?
            .json::<StockAnalysis>()
            .await?;
        Ok(analysis)
    }

    async fn fetch_symbol(&self) -> Result<Option<String>> {
        let symbol = self.get(&["stock"]).await?.text().await?;
        let symbol = symbol.trim();
        Ok((!symbol.is_empty()).then(|| symbol.to_string()))
    }
}

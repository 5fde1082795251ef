use crate::core::analysis::{analyze_quotes, DEFAULT_VOLATILITY_THRESHOLD};
use crate::core::{QuoteProvider, StockAnalysis};
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisWindow {
    pub interval: String,
    pub range: String,
    pub volatility_threshold: f64,
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self {
            interval: "1d".to_string(),
            range: "6mo".to_string(),
            volatility_threshold: DEFAULT_VOLATILITY_THRESHOLD,
        }
    }
}

/// Fetches a symbol's quote window from a provider and analyzes it.
#[derive(Clone)]
pub struct StockMonitor {
    provider: Arc<dyn QuoteProvider>,
    window: AnalysisWindow,
}

impl StockMonitor {
    pub fn new(provider: Arc<dyn QuoteProvider>, window: AnalysisWindow) -> Self {
        Self { provider, window }
    }

    pub fn window(&self) -> &AnalysisWindow {
        &self.window
    }

    pub async fn analyze_stock(&self, symbol: &str) -> Result<StockAnalysis> {
        tracing::debug!(
            "Fetching {} quotes for {} over {}",
            self.window.interval,
            symbol,
            self.window.range
        );
        let quotes = self
            .provider
            .fetch_quotes(symbol, &self.window.interval, &self.window.range)
            .await?;
        tracing::debug!("Provider returned {} quotes for {}", quotes.len(), symbol);

        analyze_quotes(symbol, &quotes, self.window.volatility_threshold)
    }
}

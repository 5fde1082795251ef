use crate::domain::model::{RawQuote, StockAnalysis};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::rc::Rc;

/// Upstream source of daily quotes. Shared across service request handlers.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quotes(&self, symbol: &str, interval: &str, range: &str) -> Result<Vec<RawQuote>>;
}

/// The capability injected into the page controller: everything the page
/// needs from the chart module.
#[async_trait(?Send)]
pub trait StockCapability {
    async fn fetch_stock_data(&self, symbol: &str) -> Result<StockAnalysis>;

    /// `None` when the service has no symbol to suggest.
    async fn fetch_symbol(&self) -> Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisplay {
    None,
    Inline,
}

impl ErrorDisplay {
    pub fn as_css(&self) -> &'static str {
        match self {
            ErrorDisplay::None => "none",
            ErrorDisplay::Inline => "inline",
        }
    }
}

pub trait SubmitEvent {
    fn prevent_default(&self);
}

pub type SubmitHandler = Rc<dyn Fn(&dyn SubmitEvent) -> LocalBoxFuture<'static, ()>>;

/// Element ids of the page the controller drives.
pub mod dom {
    pub const STOCK_FORM: &str = "stockForm";
    pub const SYMBOL_INPUT: &str = "symbolInput";
    pub const ERROR_TEXT: &str = "errorText";
    pub const ANALYSIS_SUMMARY: &str = "analysisSummary";
}

/// A page with one symbol form and one error banner.
pub trait PageView {
    fn input_value(&self) -> String;
    fn set_input_value(&self, value: &str);
    fn set_error_display(&self, display: ErrorDisplay);

    fn render_analysis(&self, _analysis: &StockAnalysis) {}

    /// Terminal state after a failed bootstrap.
    fn show_load_failure(&self, message: &str);

    fn bind_submit(&self, handler: SubmitHandler) -> Result<()>;
}

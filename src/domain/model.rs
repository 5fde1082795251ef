use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One provider row before any date conversion or analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub close: f64,
    pub adjclose: f64,
    pub is_volatile: bool,
}

/// Six-month summary of a ticker as served by `GET /stock/{symbol}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub min_close_price: f64,
    pub max_close_price: f64,
    pub min_close_date: NaiveDate,
    pub max_close_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_low_price: f64,
    pub max_high_price: f64,
    pub regular_quotes: Vec<DailyQuote>,
    pub volatile_quotes: Vec<DailyQuote>,
}

impl StockAnalysis {
    pub fn quote_count(&self) -> usize {
        self.regular_quotes.len() + self.volatile_quotes.len()
    }

    /// All quotes merged back into trading-date order.
    pub fn quotes_by_date(&self) -> Vec<&DailyQuote> {
        let mut quotes: Vec<&DailyQuote> = self
            .regular_quotes
            .iter()
            .chain(self.volatile_quotes.iter())
            .collect();
        quotes.sort_by_key(|quote| quote.date);
        quotes
    }
}

/// Last symbol requested from the service.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub user_input: Option<String>,
}

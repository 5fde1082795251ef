use crate::core::{DailyQuote, StockAnalysis};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// (date, open, high, low, close)
pub type Candle = (NaiveDate, f64, f64, f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleStyle {
    /// Hollow candles.
    Regular,
    /// Filled candles.
    Volatile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: &'static str,
    pub style: CandleStyle,
    pub candles: Vec<Candle>,
}

/// Everything a candlestick renderer needs for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub caption: String,
    pub x_range: (NaiveDate, NaiveDate),
    pub y_range: (f64, f64),
    pub series: Vec<ChartSeries>,
}

const DATE_MARGIN_DAYS: i64 = 2;

fn candles(quotes: &[DailyQuote]) -> Vec<Candle> {
    quotes
        .iter()
        .map(|quote| (quote.date, quote.open, quote.high, quote.low, quote.close))
        .collect()
}

impl ChartLayout {
    pub fn from_analysis(analysis: &StockAnalysis) -> Self {
        let margin = Duration::days(DATE_MARGIN_DAYS);
        Self {
            caption: format!("Monitoring {} (Past 6 Months)", analysis.symbol),
            x_range: (
                analysis
                    .start_date
                    .checked_sub_signed(margin)
                    .unwrap_or(analysis.start_date),
                analysis
                    .end_date
                    .checked_add_signed(margin)
                    .unwrap_or(analysis.end_date),
            ),
            y_range: (analysis.min_low_price, analysis.max_high_price),
            series: vec![
                ChartSeries {
                    label: "Empty Candlestick: Regular Quotes",
                    style: CandleStyle::Regular,
                    candles: candles(&analysis.regular_quotes),
                },
                ChartSeries {
                    label: "Filled Candlestick: Volatile Quotes",
                    style: CandleStyle::Volatile,
                    candles: candles(&analysis.volatile_quotes),
                },
            ],
        }
    }
}

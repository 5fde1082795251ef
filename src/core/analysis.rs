use crate::domain::model::{DailyQuote, RawQuote, StockAnalysis};
use crate::utils::error::{Result, StockrError};
use chrono::{DateTime, NaiveDate};

pub const DEFAULT_VOLATILITY_THRESHOLD: f64 = 0.02;

/// UTC calendar date of a unix timestamp.
pub fn timestamp_to_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// A day is volatile when its intraday range exceeds `threshold` of the low.
pub fn determine_volatility(high: f64, low: f64, threshold: f64) -> bool {
    if low <= 0.0 {
        return false;
    }
    (high - low) / low > threshold
}

fn update_min_max_prices(analysis: &mut StockAnalysis, quote: &DailyQuote) {
    if quote.low < analysis.min_low_price {
        analysis.min_low_price = quote.low;
    }
    if quote.high > analysis.max_high_price {
        analysis.max_high_price = quote.high;
    }
    if quote.close < analysis.min_close_price {
        analysis.min_close_price = quote.close;
        analysis.min_close_date = quote.date;
    }
    if quote.close > analysis.max_close_price {
        analysis.max_close_price = quote.close;
        analysis.max_close_date = quote.date;
    }
}

pub fn analyze_quotes(symbol: &str, quotes: &[RawQuote], threshold: f64) -> Result<StockAnalysis> {
    let dated: Vec<(NaiveDate, &RawQuote)> = quotes
        .iter()
        .filter_map(|quote| match timestamp_to_date(quote.timestamp) {
            Some(date) => Some((date, quote)),
            None => {
                tracing::warn!("Skipping quote with invalid timestamp {}", quote.timestamp);
                None
            }
        })
        .collect();

    let (Some((start_date, _)), Some((end_date, _))) = (dated.first(), dated.last()) else {
        return Err(StockrError::NoQuotes {
            symbol: symbol.to_string(),
        });
    };

    let mut analysis = StockAnalysis {
        symbol: symbol.to_string(),
        min_close_price: f64::MAX,
        max_close_price: f64::MIN,
        min_close_date: *start_date,
        max_close_date: *start_date,
        start_date: *start_date,
        end_date: *end_date,
        min_low_price: f64::MAX,
        max_high_price: f64::MIN,
        regular_quotes: Vec::new(),
        volatile_quotes: Vec::new(),
    };

    for (date, quote) in dated {
        let daily_quote = DailyQuote {
            date,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            volume: quote.volume,
            close: quote.close,
            adjclose: quote.adjclose,
            is_volatile: determine_volatility(quote.high, quote.low, threshold),
        };

        update_min_max_prices(&mut analysis, &daily_quote);

        if daily_quote.is_volatile {
            analysis.volatile_quotes.push(daily_quote);
        } else {
            analysis.regular_quotes.push(daily_quote);
        }
    }

    tracing::debug!(
        "Analyzed {} quotes for {} ({} volatile)",
        analysis.quote_count(),
        symbol,
        analysis.volatile_quotes.len()
    );

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-02 00:00:00 UTC
    const DAY0: i64 = 1_704_153_600;
    const DAY: i64 = 86_400;

    fn raw(day: i64, open: f64, high: f64, low: f64, close: f64) -> RawQuote {
        RawQuote {
            timestamp: DAY0 + day * DAY,
            open,
            high,
            low,
            close,
            volume: 1_000,
            adjclose: close,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_timestamp_to_date() {
        assert_eq!(timestamp_to_date(DAY0), Some(date(2)));
        assert_eq!(timestamp_to_date(DAY0 + DAY - 1), Some(date(2)));
        assert_eq!(timestamp_to_date(i64::MAX), None);
    }

    #[test]
    fn test_determine_volatility_is_strict() {
        assert!(!determine_volatility(102.0, 100.0, 0.02));
        assert!(determine_volatility(102.5, 100.0, 0.02));
        assert!(!determine_volatility(101.0, 100.0, 0.02));
    }

    #[test]
    fn test_determine_volatility_non_positive_low() {
        assert!(!determine_volatility(5.0, 0.0, 0.02));
        assert!(!determine_volatility(5.0, -1.0, 0.02));
    }

    #[test]
    fn test_analyze_quotes_splits_and_tracks_extremes() {
        let quotes = vec![
            raw(0, 100.0, 101.0, 99.5, 100.5),
            raw(1, 100.5, 106.0, 100.0, 105.0),
            raw(2, 105.0, 105.5, 95.0, 96.0),
            raw(3, 96.0, 97.0, 96.0, 96.5),
        ];

        let analysis = analyze_quotes("AAPL", &quotes, DEFAULT_VOLATILITY_THRESHOLD).unwrap();

        assert_eq!(analysis.symbol, "AAPL");
        assert_eq!(analysis.start_date, date(2));
        assert_eq!(analysis.end_date, date(5));
        assert_eq!(analysis.regular_quotes.len(), 2);
        assert_eq!(analysis.volatile_quotes.len(), 2);
        assert!(analysis.volatile_quotes.iter().all(|q| q.is_volatile));

        assert_eq!(analysis.min_close_price, 96.0);
        assert_eq!(analysis.min_close_date, date(4));
        assert_eq!(analysis.max_close_price, 105.0);
        assert_eq!(analysis.max_close_date, date(3));
        assert_eq!(analysis.min_low_price, 95.0);
        assert_eq!(analysis.max_high_price, 106.0);
    }

    #[test]
    fn test_analyze_quotes_keeps_first_day_of_a_tie() {
        let quotes = vec![
            raw(0, 10.0, 10.1, 9.9, 10.0),
            raw(1, 10.0, 10.1, 9.9, 10.0),
        ];

        let analysis = analyze_quotes("TIE", &quotes, DEFAULT_VOLATILITY_THRESHOLD).unwrap();

        assert_eq!(analysis.min_close_date, date(2));
        assert_eq!(analysis.max_close_date, date(2));
    }

    #[test]
    fn test_analyze_quotes_skips_invalid_timestamps() {
        let mut bad = raw(0, 1.0, 1.0, 1.0, 1.0);
        bad.timestamp = i64::MIN;
        let quotes = vec![bad, raw(1, 20.0, 20.1, 19.9, 20.0)];

        let analysis = analyze_quotes("SKIP", &quotes, DEFAULT_VOLATILITY_THRESHOLD).unwrap();

        assert_eq!(analysis.quote_count(), 1);
        assert_eq!(analysis.start_date, date(3));
    }

    #[test]
    fn test_analyze_quotes_empty_series() {
        let err = analyze_quotes("NONE", &[], DEFAULT_VOLATILITY_THRESHOLD).unwrap_err();
        assert!(matches!(err, StockrError::NoQuotes { symbol } if symbol == "NONE"));
    }

    #[test]
    fn test_quotes_by_date_merges_in_order() {
        let quotes = vec![
            raw(0, 100.0, 110.0, 100.0, 105.0),
            raw(1, 105.0, 105.5, 105.0, 105.2),
            raw(2, 105.0, 120.0, 100.0, 119.0),
        ];
        let analysis = analyze_quotes("ORD", &quotes, DEFAULT_VOLATILITY_THRESHOLD).unwrap();

        let dates: Vec<NaiveDate> = analysis.quotes_by_date().iter().map(|q| q.date).collect();
        assert_eq!(dates, vec![date(2), date(3), date(4)]);
    }
}

use crate::core::StockAnalysis;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct QuoteRow<'a> {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    adj_close: f64,
    volatile: &'a str,
}

fn flag(is_volatile: bool) -> &'static str {
    if is_volatile {
        "Yes"
    } else {
        "No"
    }
}

/// Tab separated quote table followed by the min/max summary.
pub fn render_table(analysis: &StockAnalysis) -> String {
    let mut lines = vec!["Date\t\tOpen\tHigh\tLow\tClose\tVolume\t\tAdj_Close\tVolatile".to_string()];
    for quote in analysis.quotes_by_date() {
        lines.push(format!(
            "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}\t{:.2}\t\t{}",
            quote.date,
            quote.open,
            quote.high,
            quote.low,
            quote.close,
            quote.volume,
            quote.adjclose,
            flag(quote.is_volatile)
        ));
    }
    lines.push(String::new());
    lines.push(render_summary(analysis));
    lines.join("\n")
}

pub fn render_summary(analysis: &StockAnalysis) -> String {
    format!(
        "Analysis Report: {}\nMin Price: {:.2} on {}\nMax Price: {:.2} on {}\nVolatile days: {} of {}",
        analysis.symbol,
        analysis.min_close_price,
        analysis.min_close_date,
        analysis.max_close_price,
        analysis.max_close_date,
        analysis.volatile_quotes.len(),
        analysis.quote_count()
    )
}

pub fn write_csv<W: Write>(analysis: &StockAnalysis, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for quote in analysis.quotes_by_date() {
        csv_writer.serialize(QuoteRow {
            date: quote.date.format("%Y-%m-%d").to_string(),
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            adj_close: quote.adjclose,
            volatile: flag(quote.is_volatile),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

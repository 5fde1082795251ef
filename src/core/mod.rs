pub mod analysis;
pub mod chart;
pub mod monitor;
pub mod report;

pub use crate::domain::model::{DailyQuote, RawQuote, StockAnalysis};
pub use crate::domain::ports::QuoteProvider;
pub use crate::utils::error::Result;

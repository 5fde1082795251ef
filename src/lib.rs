pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod frontend;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::StockrConfig;

#[cfg(not(target_arch = "wasm32"))]
pub use adapters::yahoo::YahooProvider;
pub use adapters::http_capability::HttpCapability;
pub use app::{boot, init, HttpModuleLoader, PageController};
pub use core::monitor::{AnalysisWindow, StockMonitor};
pub use domain::model::{DailyQuote, RawQuote, StockAnalysis};
pub use utils::error::{Result, StockrError};

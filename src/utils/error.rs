use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockrError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Quote provider error: {message}")]
    ProviderError { message: String },

    #[error("Unexpected HTTP status {status}: {body}")]
    StatusError { status: u16, body: String },

    #[error("No quotes returned for {symbol}")]
    NoQuotes { symbol: String },

    #[error("Chart capability has not been set up")]
    NotInitialized,

    #[error("Bootstrap failed during {stage}: {message}")]
    BootstrapError { stage: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Startup,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl StockrError {
    pub fn bootstrap(stage: &str, source: impl std::fmt::Display) -> Self {
        StockrError::BootstrapError {
            stage: stage.to_string(),
            message: source.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StockrError::ApiError(_) | StockrError::StatusError { .. } => ErrorCategory::Network,
            StockrError::SerializationError(_)
            | StockrError::CsvError(_)
            | StockrError::ProviderError { .. }
            | StockrError::NoQuotes { .. } => ErrorCategory::Data,
            StockrError::TomlError(_)
            | StockrError::ConfigError { .. }
            | StockrError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            StockrError::NotInitialized | StockrError::BootstrapError { .. } => {
                ErrorCategory::Startup
            }
            StockrError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Startup => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StockrError::ApiError(_) => "Check your network connection and that the server is running",
            StockrError::StatusError { status, .. } if *status >= 500 => {
                "The upstream service failed, try again later"
            }
            StockrError::StatusError { .. } => "Check the request URL and symbol",
            StockrError::NoQuotes { .. } | StockrError::ProviderError { .. } => {
                "Make sure the ticker symbol exists, e.g. AAPL or MSFT"
            }
            StockrError::SerializationError(_) | StockrError::CsvError(_) => {
                "The response format was unexpected, the provider API may have changed"
            }
            StockrError::TomlError(_)
            | StockrError::ConfigError { .. }
            | StockrError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            StockrError::NotInitialized => "Call setup with a chart capability before fetching",
            StockrError::BootstrapError { .. } => "Reload the page or restart the front-end",
            StockrError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StockrError::ApiError(_) => "Could not reach the stock data service".to_string(),
            StockrError::StatusError { status, .. } => {
                format!("The stock data service answered with status {}", status)
            }
            StockrError::NoQuotes { symbol } => format!("No stock data found for {}", symbol),
            StockrError::ProviderError { message } => {
                format!("The quote provider rejected the request: {}", message)
            }
            StockrError::BootstrapError { stage, .. } => {
                format!("Failed to load the chart ({})", stage)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StockrError>;

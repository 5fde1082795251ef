use crate::core::analysis::DEFAULT_VOLATILITY_THRESHOLD;
use crate::core::monitor::AnalysisWindow;
use crate::utils::error::{Result, StockrError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Yahoo Finance chart API host.
pub const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockrConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub analysis: AnalysisConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub default_symbol: Option<String>,
    pub www_dir: PathBuf,
    pub pkg_dir: PathBuf,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            default_symbol: None,
            www_dir: PathBuf::from("www"),
            pkg_dir: PathBuf::from("pkg"),
            log_json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub interval: String,
    pub range: String,
    pub volatility_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interval: "1d".to_string(),
            range: "6mo".to_string(),
            volatility_threshold: DEFAULT_VOLATILITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Defaults to the local server address.
    pub server_url: Option<String>,
}

impl StockrConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StockrError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document after environment substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Defaults when no file is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Replaces `${VAR}` references with environment values; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StockrError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_path("server.www_dir", &self.server.www_dir.to_string_lossy())?;
        validate_path("server.pkg_dir", &self.server.pkg_dir.to_string_lossy())?;
        if let Some(symbol) = &self.server.default_symbol {
            validate_non_empty_string("server.default_symbol", symbol)?;
        }

        validate_url("provider.base_url", &self.provider.base_url)?;
        validate_range("provider.timeout_seconds", self.provider.timeout_seconds, 1, 300)?;

        validate_non_empty_string("analysis.interval", &self.analysis.interval)?;
        validate_non_empty_string("analysis.range", &self.analysis.range)?;
        validate_range(
            "analysis.volatility_threshold",
            self.analysis.volatility_threshold,
            0.0,
            1.0,
        )?;

        if let Some(url) = &self.watch.server_url {
            validate_url("watch.server_url", url)?;
        }

        Ok(())
    }

    /// Applies `serve` overrides. Symbols are upper-cased.
    pub fn apply_server_overrides(&mut self, symbol: Option<String>, port: Option<u16>, host: Option<String>) {
        if let Some(symbol) = symbol {
            self.server.default_symbol = Some(symbol);
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(host) = host {
            self.server.host = host;
        }
        self.server.default_symbol = self
            .server
            .default_symbol
            .take()
            .map(|symbol| symbol.trim().to_uppercase());
    }

    pub fn analysis_window(&self) -> AnalysisWindow {
        AnalysisWindow {
            interval: self.analysis.interval.clone(),
            range: self.analysis.range.clone(),
            volatility_threshold: self.analysis.volatility_threshold,
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds)
    }

    pub fn watch_server_url(&self) -> String {
        self.watch
            .server_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }
}

impl Validate for StockrConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

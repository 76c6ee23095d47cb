//! Configuration structures for the analytics pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for ordertally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Report shaping configuration.
    pub report: ReportConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Report shaping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of sizes in the overall ranking.
    pub top_sizes: usize,

    /// Number of sizes in each per-file ranking.
    pub per_file_top_sizes: usize,

    /// Maximum rows in the customer table.
    pub max_customers: usize,

    /// Demand forecast settings.
    pub forecast: ForecastConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_sizes: 5,
            per_file_top_sizes: 5,
            max_customers: 20,
            forecast: ForecastConfig::default(),
        }
    }
}

/// Naive demand forecast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Include `predicted_top_sizes` in reports.
    pub enabled: bool,

    /// Width of the trailing moving average.
    pub window: usize,

    /// Multiplier applied to the moving average.
    pub growth_factor: f64,

    /// Number of predicted sizes to report.
    pub top: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: 3,
            growth_factor: 1.1,
            top: 5,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,

    /// Output format: `plain` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

impl TallyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

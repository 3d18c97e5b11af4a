use std::{path::PathBuf, time::Duration};

use crate::error::{Error, Result};

/// Endpoint used until the user enters another one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/detect";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;

/// Settings read by the detection client on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub endpoint: String,
    /// Return the canned fixture instead of calling `endpoint`.
    pub use_mock: bool,
    pub timeout: Duration,
    /// Synthetic latency applied in mock mode.
    pub mock_delay: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            use_mock: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    /// TrueType font used for box labels.
    pub font_path: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads the `WASTELENS_*` vars.
    pub fn from_env() -> Result<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = get("WASTELENS_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let use_mock = match get("WASTELENS_USE_MOCK") {
            Some(raw) => parse_bool("WASTELENS_USE_MOCK", &raw)?,
            None => false,
        };
        let timeout_secs = parse_u64(&get, "WASTELENS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let mock_delay_ms = parse_u64(&get, "WASTELENS_MOCK_DELAY_MS", DEFAULT_MOCK_DELAY_MS)?;

        Ok(Self {
            detector: DetectorConfig {
                endpoint,
                use_mock,
                timeout: Duration::from_secs(timeout_secs),
                mock_delay: Duration::from_millis(mock_delay_ms),
            },
            font_path: get("WASTELENS_FONT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            font_path: None,
            log_level: "info".to_string(),
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!("invalid {key}: {other}"))),
    }
}

fn parse_u64<F>(get: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid {key}: {e}"))),
        None => Ok(default),
    }
}

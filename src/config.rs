use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::ocr::health::OcrHealthChecker;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPLOAD_PATH: &str = "uploads";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;
pub const DEFAULT_EXTRACTION_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding uploads while they are being processed
    pub upload_path: String,
    /// Directory served as static assets at the root path
    pub public_dir: String,
    pub ocr_language: String,
    pub max_file_size_mb: u64,
    pub extraction_timeout_seconds: u64,
    pub cors_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            public_dir: DEFAULT_PUBLIC_DIR.to_string(),
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            extraction_timeout_seconds: DEFAULT_EXTRACTION_TIMEOUT_SECONDS,
            cors_enabled: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env("PORT")?.unwrap_or(defaults.port),
            upload_path: env::var("UPLOAD_PATH").unwrap_or(defaults.upload_path),
            public_dir: env::var("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            ocr_language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr_language),
            max_file_size_mb: parse_env("MAX_FILE_SIZE_MB")?.unwrap_or(defaults.max_file_size_mb),
            extraction_timeout_seconds: parse_env("EXTRACTION_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.extraction_timeout_seconds),
            cors_enabled: parse_bool_env("CORS_ENABLED")?.unwrap_or(defaults.cors_enabled),
        };

        config.validate()?;

        info!(
            host = %config.host,
            port = config.port,
            upload_path = %config.upload_path,
            public_dir = %config.public_dir,
            ocr_language = %config.ocr_language,
            max_file_size_mb = config.max_file_size_mb,
            extraction_timeout_seconds = config.extraction_timeout_seconds,
            cors_enabled = config.cors_enabled,
            "Loaded configuration"
        );

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        OcrHealthChecker::new()
            .validate_language_combination(&self.ocr_language)
            .map_err(|e| anyhow!("Invalid OCR_LANGUAGE: {}", e))?;

        if self.max_file_size_mb == 0 {
            return Err(anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.extraction_timeout_seconds == 0 {
            warn!("EXTRACTION_TIMEOUT_SECONDS is 0; every extraction will time out immediately");
        }

        Ok(())
    }

    /// Bind the listening socket. `host` may be an IP address or a hostname.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| anyhow!("Failed to bind {}:{}: {}", self.host, self.port, e))
    }

    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_seconds)
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("Invalid value for {}: '{}' ({})", name, value, e)),
        Err(_) => Ok(None),
    }
}

fn parse_bool_env(name: &str) -> Result<Option<bool>> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(anyhow!("Invalid value for {}: '{}' (expected true/false)", name, value)),
        },
        Err(_) => Ok(None),
    }
}

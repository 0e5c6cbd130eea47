use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::receipts::{DateValidation, ReceiptBonusMode, ScoringConfig, ValidationConfig};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub receipts: ReceiptsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let receipts = ReceiptsConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            receipts,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the validation and scoring pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiptsConfig {
    pub bonus_mode: ReceiptBonusMode,
    pub date_validation: DateValidation,
}

impl ReceiptsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let bonus_mode = match env::var("RECEIPTS_BONUS_MODE") {
            Ok(raw) => ReceiptBonusMode::parse(&raw)
                .ok_or(ConfigError::InvalidBonusMode { value: raw })?,
            Err(_) => ReceiptBonusMode::default(),
        };

        let date_validation = match env::var("RECEIPTS_DATE_VALIDATION") {
            Ok(raw) => DateValidation::parse(&raw)
                .ok_or(ConfigError::InvalidDateValidation { value: raw })?,
            Err(_) => DateValidation::default(),
        };

        Ok(Self {
            bonus_mode,
            date_validation,
        })
    }

    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            date_validation: self.date_validation,
        }
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            bonus_mode: self.bonus_mode,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBonusMode { value: String },
    InvalidDateValidation { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBonusMode { value } => write!(
                f,
                "RECEIPTS_BONUS_MODE must be 'per-receipt' or 'per-item' (got '{value}')"
            ),
            ConfigError::InvalidDateValidation { value } => write!(
                f,
                "RECEIPTS_DATE_VALIDATION must be 'lenient' or 'strict' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBonusMode { .. }
            | ConfigError::InvalidDateValidation { .. } => None,
        }
    }
}

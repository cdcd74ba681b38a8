use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::compliance::policy::{
    DEFAULT_AT_RISK_THRESHOLD, DEFAULT_MAX_STAY_DAYS, DEFAULT_WINDOW_DAYS,
};

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
    pub rules: RuleConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let rules = RuleConfig {
            max_stay_days: day_count("SCHENGEN_MAX_STAY_DAYS", DEFAULT_MAX_STAY_DAYS, 1)?,
            window_days: day_count("SCHENGEN_WINDOW_DAYS", DEFAULT_WINDOW_DAYS, 1)?,
            at_risk_threshold: day_count("SCHENGEN_AT_RISK_DAYS", DEFAULT_AT_RISK_THRESHOLD, 0)?,
            strict_countries: flag("SCHENGEN_STRICT_COUNTRIES")?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rules,
        })
    }
}

fn day_count(name: &'static str, default: u32, min: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(days) if days >= min => Ok(days),
            _ => Err(ConfigError::InvalidDayCount { name, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

fn flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value: raw }),
        },
        Err(_) => Ok(false),
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

/// Allowance settings for the rolling-window rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub max_stay_days: u32,
    pub window_days: u32,
    pub at_risk_threshold: u32,
    pub strict_countries: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_stay_days: DEFAULT_MAX_STAY_DAYS,
            window_days: DEFAULT_WINDOW_DAYS,
            at_risk_threshold: DEFAULT_AT_RISK_THRESHOLD,
            strict_countries: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDayCount { name: &'static str, value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDayCount { name, value } => {
                write!(f, "{name} must be a whole number of days (found '{value}')")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDayCount { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}

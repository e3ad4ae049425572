use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::questionnaire::bank::{BankLoadError, QuestionBank};
use crate::questionnaire::domain::Category;
use crate::questionnaire::scoring::{
    ScoringConfig, ScoringConfigError, DEFAULT_DETAILED_THRESHOLD, DEFAULT_RELEVANCE_THRESHOLD,
};

/// Minutes a stored session may sit untouched before the host drops it.
pub const DEFAULT_SESSION_IDLE_MINUTES: u32 = 60;

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
    pub questionnaire: QuestionnaireConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            questionnaire: QuestionnaireConfig::from_env()?,
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

/// Question bank source and ranking dials.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireConfig {
    /// JSON bank document; the built-in catalog is used when unset.
    pub bank_path: Option<PathBuf>,
    pub relevance_threshold: f64,
    pub detailed_threshold: f64,
    pub fallback_category: Category,
    pub session_idle_minutes: u32,
}

impl Default for QuestionnaireConfig {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        Self {
            bank_path: None,
            relevance_threshold: scoring.relevance_threshold,
            detailed_threshold: scoring.detailed_threshold,
            fallback_category: scoring.fallback_category,
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

impl QuestionnaireConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let bank_path = env::var("QUESTIONNAIRE_BANK_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let relevance_threshold = threshold_var(
            "QUESTIONNAIRE_RELEVANCE_THRESHOLD",
            DEFAULT_RELEVANCE_THRESHOLD,
        )?;
        let detailed_threshold =
            threshold_var("QUESTIONNAIRE_DETAILED_THRESHOLD", DEFAULT_DETAILED_THRESHOLD)?;

        let fallback_category = match env::var("QUESTIONNAIRE_FALLBACK_CATEGORY") {
            Ok(raw) => Category::parse(&raw).ok_or(ConfigError::UnknownCategory { value: raw })?,
            Err(_) => ScoringConfig::default().fallback_category,
        };

        let session_idle_minutes = match env::var("QUESTIONNAIRE_SESSION_IDLE_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or(ConfigError::InvalidSessionIdle { value: raw })?,
            Err(_) => DEFAULT_SESSION_IDLE_MINUTES,
        };

        Ok(Self {
            bank_path,
            relevance_threshold,
            detailed_threshold,
            fallback_category,
            session_idle_minutes,
        })
    }

    /// Validated ranking configuration built from these settings.
    pub fn scoring_config(&self) -> Result<ScoringConfig, ScoringConfigError> {
        let config = ScoringConfig {
            relevance_threshold: self.relevance_threshold,
            detailed_threshold: self.detailed_threshold,
            fallback_category: self.fallback_category,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load_bank(&self) -> Result<QuestionBank, BankLoadError> {
        match &self.bank_path {
            Some(path) => QuestionBank::from_path(path),
            None => Ok(QuestionBank::standard()),
        }
    }
}

fn threshold_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidThreshold { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { name: &'static str, value: String },
    UnknownCategory { value: String },
    InvalidSessionIdle { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { name, value } => {
                write!(f, "{name} must be a number, got '{value}'")
            }
            ConfigError::UnknownCategory { value } => write!(
                f,
                "QUESTIONNAIRE_FALLBACK_CATEGORY '{value}' is not one of web, photo, cinema, automation, ai, tech"
            ),
            ConfigError::InvalidSessionIdle { value } => write!(
                f,
                "QUESTIONNAIRE_SESSION_IDLE_MINUTES must be a positive whole number, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::UnknownCategory { .. }
            | ConfigError::InvalidSessionIdle { .. } => None,
        }
    }
}

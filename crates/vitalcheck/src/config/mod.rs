use crate::assessment::{Language, DEFAULT_RECOMMENDATION_LIMIT};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub assessment: AssessmentConfig,
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
            assessment: AssessmentConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring and recommendation dials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentConfig {
    /// Language used when a submission does not name one.
    pub default_language: Language,
    /// Upper bound on recommendations sampled per pillar.
    pub recommendation_limit: usize,
    /// Fixed seed for reproducible recommendation sampling; entropy when unset.
    pub recommendation_seed: Option<u64>,
    /// Directory holding `<language>.json` question bank overrides.
    pub question_bank_dir: Option<PathBuf>,
}

impl AssessmentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let default_language = match env::var("APP_DEFAULT_LANGUAGE") {
            Ok(raw) => Language::from_code(&raw).ok_or(ConfigError::InvalidLanguage(raw))?,
            Err(_) => Language::default(),
        };

        let recommendation_limit = match env::var("APP_RECOMMENDATION_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidRecommendationLimit)?,
            Err(_) => DEFAULT_RECOMMENDATION_LIMIT,
        };

        let recommendation_seed = env::var("APP_RECOMMENDATION_SEED")
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidRecommendationSeed)
            })
            .transpose()?;

        let question_bank_dir = env::var("APP_QUESTION_BANK_DIR")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            default_language,
            recommendation_limit,
            recommendation_seed,
            question_bank_dir,
        })
    }
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            recommendation_seed: None,
            question_bank_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLanguage(String),
    InvalidRecommendationLimit,
    InvalidRecommendationSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLanguage(value) => {
                write!(f, "APP_DEFAULT_LANGUAGE '{value}' is not a supported language")
            }
            ConfigError::InvalidRecommendationLimit => {
                write!(f, "APP_RECOMMENDATION_LIMIT must be a positive integer")
            }
            ConfigError::InvalidRecommendationSeed => {
                write!(f, "APP_RECOMMENDATION_SEED must be a valid u64")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLanguage(_)
            | ConfigError::InvalidRecommendationLimit
            | ConfigError::InvalidRecommendationSeed => None,
        }
    }
}

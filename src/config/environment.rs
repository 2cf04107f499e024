// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Environment-based configuration management for production deployment

use crate::constants::{limits, time};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and logging defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Live deployment
    Production,
    /// Test harness
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the single-file database
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// File path of the database, if file-backed
    #[must_use]
    pub const fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::SQLite { path } => Some(path),
            Self::Memory => None,
        }
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/brasserie.db"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Where the SQLite store lives
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret; generated at startup when unset
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiry_hours: limits::DEFAULT_SESSION_HOURS as u64,
        }
    }
}

/// WebSocket hub configuration
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Seconds between heartbeat sweeps
    pub heartbeat_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: time::HEARTBEAT_INTERVAL_SECS,
        }
    }
}

/// Backup configuration
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Directory receiving timestamped database copies
    pub directory: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./backups"),
        }
    }
}

/// Mail gateway configuration; email is disabled when `api_url` is unset
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    /// HTTP endpoint of the mail gateway
    pub api_url: Option<String>,
    /// Bearer key for the gateway
    pub api_key: Option<String>,
    /// From address on outgoing mail
    pub from_address: String,
}

impl EmailConfig {
    /// Whether outbound email is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_url.is_some()
    }
}

/// Complete server configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP + WebSocket listen port
    pub http_port: u16,
    /// Log level for startup before `RUST_LOG` takes over
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Auth settings
    pub auth: AuthConfig,
    /// Hub settings
    pub websocket: WebSocketConfig,
    /// Backup settings
    pub backup: BackupConfig,
    /// Mail gateway settings
    pub email: EmailConfig,
    /// Allowed CORS origin; `*` when unset
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            websocket: WebSocketConfig::default(),
            backup: BackupConfig::default(),
            email: EmailConfig::default(),
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; variables that are set but
    /// fail to parse also fall back, with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKUP_DIR` is set to an empty string.
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_env_or("HTTP_PORT", 8080);
        let log_level =
            LogLevel::from_str_or_default(&env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        );

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map(|s| DatabaseUrl::parse_url(&s))
                .unwrap_or_default(),
        };

        let auth = AuthConfig {
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_expiry_hours: parse_env_or(
                "JWT_EXPIRY_HOURS",
                limits::DEFAULT_SESSION_HOURS as u64,
            ),
        };

        let websocket = WebSocketConfig {
            heartbeat_secs: parse_env_or("WS_HEARTBEAT_SECS", time::HEARTBEAT_INTERVAL_SECS),
        };

        let backup = match env::var("BACKUP_DIR") {
            Ok(dir) if dir.is_empty() => {
                return Err(AppError::config("BACKUP_DIR must not be empty"));
            }
            Ok(dir) => BackupConfig {
                directory: PathBuf::from(dir),
            },
            Err(_) => BackupConfig::default(),
        };

        let email = EmailConfig {
            api_url: env::var("MAIL_API_URL").ok().filter(|s| !s.is_empty()),
            api_key: env::var("MAIL_API_KEY").ok().filter(|s| !s.is_empty()),
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@brasserie.example".into()),
        };

        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty());

        Ok(Self {
            http_port,
            log_level,
            environment,
            database,
            auth,
            websocket,
            backup,
            email,
            cors_origin,
        })
    }

    /// One-line startup summary for the logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} env={} db={} heartbeat={}s email={}",
            self.http_port,
            self.environment,
            self.database.url.to_connection_string(),
            self.websocket.heartbeat_secs,
            if self.email.is_enabled() { "on" } else { "off" },
        )
    }
}

/// Parse an env var, falling back to a default (with a warning) on bad input
fn parse_env_or<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("invalid {name}={raw}, falling back to {default}");
            default
        }),
        Err(_) => default,
    }
}

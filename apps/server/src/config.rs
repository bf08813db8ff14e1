//! Application configuration loaded from environment variables.

use std::env;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "sqlite://store.db?mode=rwc";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8000;
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 5;
    pub const DEV_DB_MIN_CONNECTIONS: u32 = 1;

    // Harness targets (the store service itself, by default)
    pub const DEV_REST_BASE_URL: &str = "http://127.0.0.1:8000";
    pub const DEV_SOAP_ENDPOINT: &str = "http://127.0.0.1:8000/soap/";
    pub const DEV_RUN_ENVIRONMENT: &str = "local";
    pub const DEV_TESTER: &str = "automated";

    // Issue tracker defaults for development
    pub const DEV_TRACKER_SERVER: &str = "http://localhost:8081";
    pub const DEV_TRACKER_USERNAME: &str = "qa-bot@example.com";
    pub const DEV_TRACKER_API_TOKEN: &str = "dev-tracker-token-do-not-use-in-production";
    pub const DEV_TRACKER_PROJECT_KEY: &str = "SCRUM";
    pub const DEV_TRACKER_ISSUE_PREFIX: &str = "SCRUM";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Relational store settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Connection string (`sqlite://...` or `postgres://...`)
    pub url: String,
    /// Upper bound of pooled connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
}

impl DatabaseSettings {
    /// Settings for a private in-memory SQLite store.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        }
    }
}

/// Where the harness sends requests and how it labels result rows.
#[derive(Debug, Clone)]
pub struct HarnessSettings {
    /// Base URL prepended to REST case endpoints
    pub rest_base_url: String,
    /// Full URL of the SOAP endpoint
    pub soap_endpoint: String,
    /// Value written to `test_results.environment`
    pub run_environment: String,
    /// Value written to `test_results.tester`
    pub tester: String,
}

/// External issue tracker (Jira) settings.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// Tracker base URL
    pub server: String,
    /// Account used for basic auth
    pub username: String,
    /// API token used for basic auth
    pub api_token: SecretString,
    /// Project defects are filed in
    pub project_key: String,
    /// Prefix of the per-case issue keys (`<prefix>-<n>`)
    pub issue_prefix: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Relational store settings
    pub database: DatabaseSettings,
    /// Harness targets and row labels
    pub harness: HarnessSettings,
    /// Issue tracker connection
    pub tracker: TrackerSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode the database URL and tracker credentials must be set
    /// explicitly; development defaults are rejected.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `STORE_HOST` / `STORE_PORT`: Store service bind address (default: 127.0.0.1:8000)
    /// - `DATABASE_URL`: Store connection string (default: sqlite://store.db?mode=rwc)
    /// - `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS`: Pool bounds (default: 5 / 1)
    /// - `QA_REST_BASE_URL`: Base URL for REST cases
    /// - `QA_SOAP_ENDPOINT`: SOAP endpoint URL
    /// - `QA_ENVIRONMENT` / `QA_TESTER`: Result row labels (default: local / automated)
    /// - `JIRA_SERVER`, `JIRA_USERNAME`, `JIRA_API_TOKEN`, `JIRA_PROJECT_KEY`: Tracker access
    /// - `QA_ISSUE_KEY`: Prefix of per-case tracker issues (default: SCRUM)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("STORE_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("STORE_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("STORE_PORT must be a valid port number"))?;

        let database = DatabaseSettings {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| defaults::DEV_DB_MAX_CONNECTIONS.to_string())
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS must be a valid number"))?,
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .unwrap_or_else(|_| defaults::DEV_DB_MIN_CONNECTIONS.to_string())
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue("DB_MIN_CONNECTIONS must be a valid number"))?,
        };

        let harness = HarnessSettings {
            rest_base_url: env::var("QA_REST_BASE_URL")
                .unwrap_or_else(|_| defaults::DEV_REST_BASE_URL.to_string()),
            soap_endpoint: env::var("QA_SOAP_ENDPOINT")
                .unwrap_or_else(|_| defaults::DEV_SOAP_ENDPOINT.to_string()),
            run_environment: env::var("QA_ENVIRONMENT")
                .unwrap_or_else(|_| defaults::DEV_RUN_ENVIRONMENT.to_string()),
            tester: env::var("QA_TESTER").unwrap_or_else(|_| defaults::DEV_TESTER.to_string()),
        };

        let tracker = TrackerSettings {
            server: env::var("JIRA_SERVER")
                .unwrap_or_else(|_| defaults::DEV_TRACKER_SERVER.to_string()),
            username: env::var("JIRA_USERNAME")
                .unwrap_or_else(|_| defaults::DEV_TRACKER_USERNAME.to_string()),
            api_token: SecretString::from(
                env::var("JIRA_API_TOKEN")
                    .unwrap_or_else(|_| defaults::DEV_TRACKER_API_TOKEN.to_string()),
            ),
            project_key: env::var("JIRA_PROJECT_KEY")
                .unwrap_or_else(|_| defaults::DEV_TRACKER_PROJECT_KEY.to_string()),
            issue_prefix: env::var("QA_ISSUE_KEY")
                .unwrap_or_else(|_| defaults::DEV_TRACKER_ISSUE_PREFIX.to_string()),
        };

        let config = Config {
            environment,
            host,
            port,
            database,
            harness,
            tracker,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production database URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.tracker.server == defaults::DEV_TRACKER_SERVER {
            errors.push("JIRA_SERVER is using development default. Set the tracker URL.".to_string());
        }

        if self.tracker.api_token.expose_secret() == defaults::DEV_TRACKER_API_TOKEN {
            errors.push(
                "JIRA_API_TOKEN is using development default. Set a real tracker API token."
                    .to_string(),
            );
        }

        if self.database.min_connections > self.database.max_connections {
            errors.push("DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}

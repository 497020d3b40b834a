//! Application settings and configuration structures.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port, body limit)
    pub server: ServerSettings,

    /// The single browser origin allowed to call the API with credentials
    pub client_url: String,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Session token verification settings
    pub auth: AuthSettings,

    /// Chat provider credentials used to mint client tokens
    pub chat: ChatSettings,

    /// Sentry error telemetry
    pub sentry: SentrySettings,

    /// Background job (Inngest) integration
    pub jobs: JobsSettings,

    /// Static frontend assets
    #[serde(default)]
    pub assets: AssetSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,

    /// Maximum accepted JSON body size in bytes
    pub body_limit: usize,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Session token verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret used to verify session tokens. Empty means unset.
    pub secret_key: String,
}

/// Chat provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    pub api_key: String,
    pub api_secret: String,
    pub token_ttl_minutes: i64,
}

/// Sentry configuration. An empty DSN disables event delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct SentrySettings {
    pub dsn: String,
    pub traces_sample_rate: f32,
}

/// Background job integration configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsSettings {
    /// Application id reported to the job platform
    pub app_id: String,

    /// Event key; without it the job client cannot be created
    pub event_key: String,

    /// Signing key checked on invocation requests when non-empty
    pub signing_key: String,
}

/// Static asset configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetSettings {
    /// Explicit asset root. When unset, `public/` next to the executable.
    pub dir: Option<PathBuf>,
}

/// Minimum required length for the session secret (256 bits = 32 bytes)
pub const MIN_AUTH_SECRET_LENGTH: usize = 32;

/// Default JSON body limit, matching the usual 100kb parser default
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// Integration credentials are not validated here: a bad secret must only
    /// disable the capability that needs it, not the whole process.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.body_limit", DEFAULT_BODY_LIMIT as i64)?
            .set_default("client_url", "http://localhost:5173")?
            .set_default("database.url", "postgres://localhost:5432/chat")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("auth.secret_key", "")?
            .set_default("chat.api_key", "")?
            .set_default("chat.api_secret", "")?
            .set_default("chat.token_ttl_minutes", 60)?
            .set_default("sentry.dsn", "")?
            .set_default("sentry.traces_sample_rate", 1.0)?
            .set_default("jobs.app_id", "chat-backend")?
            .set_default("jobs.event_key", "")?
            .set_default("jobs.signing_key", "")?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("HOST").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("client_url", std::env::var("CLIENT_URL").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("auth.secret_key", std::env::var("AUTH_SECRET_KEY").ok())?
            .set_override_option("chat.api_key", std::env::var("CHAT_API_KEY").ok())?
            .set_override_option("chat.api_secret", std::env::var("CHAT_API_SECRET").ok())?
            .set_override_option("sentry.dsn", std::env::var("SENTRY_DSN").ok())?
            .set_override_option("jobs.event_key", std::env::var("INNGEST_EVENT_KEY").ok())?
            .set_override_option("jobs.signing_key", std::env::var("INNGEST_SIGNING_KEY").ok())?
            .set_override_option("assets.dir", std::env::var("STATIC_DIR").ok())?
            .build()?
            .try_deserialize()
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings for tests and local runs: every integration
    /// configured, listening on an ephemeral local port.
    pub fn local() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 0,
                body_limit: DEFAULT_BODY_LIMIT,
            },
            client_url: "http://localhost:5173".into(),
            database: DatabaseSettings {
                url: "postgres://localhost:5432/chat".into(),
                max_connections: 2,
                min_connections: 0,
                acquire_timeout: 5,
            },
            auth: AuthSettings {
                secret_key: "local-session-secret-local-session-secret".into(),
            },
            chat: ChatSettings {
                api_key: "local-chat-key".into(),
                api_secret: "local-chat-secret".into(),
                token_ttl_minutes: 60,
            },
            sentry: SentrySettings {
                dsn: String::new(),
                traces_sample_rate: 0.0,
            },
            jobs: JobsSettings {
                app_id: "chat-backend".into(),
                event_key: "local-event-key".into(),
                signing_key: String::new(),
            },
            assets: AssetSettings { dir: None },
            environment: "test".into(),
        }
    }
}

//! Configuration management for the exporter
//!
//! Configuration is built once at process start and passed down explicitly.
//! Sources, highest precedence first:
//! 1. Command-line flags (log verbosity only, local mode)
//! 2. Environment variables
//! 3. Configuration file (TOML, path from `--config` or `EXPORTER_CONFIG`)
//! 4. Default values
//!
//! Environment variable names match the deployed function's settings:
//! `MONGODB_URI`, `TG_AWS_ACCESS_KEY_ID`, `TG_AWS_SECRET_ACCESS_KEY`,
//! `TG_AWS_REGION` and `S3_BUCKET_NAME`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Logical database exported on every run.
pub const DATABASE_NAME: &str = "configurator";

pub const ENV_MONGODB_URI: &str = "MONGODB_URI";
pub const ENV_ACCESS_KEY_ID: &str = "TG_AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "TG_AWS_SECRET_ACCESS_KEY";
pub const ENV_REGION: &str = "TG_AWS_REGION";
pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";
pub const ENV_ENDPOINT_URL: &str = "S3_ENDPOINT_URL";
pub const ENV_CONFIG_FILE: &str = "EXPORTER_CONFIG";
pub const ENV_LOG_LEVEL: &str = "EXPORTER_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "EXPORTER_LOG_FORMAT";
pub const ENV_LOG_TIMESTAMPS: &str = "EXPORTER_LOG_TIMESTAMPS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source database configuration
    #[serde(default)]
    pub mongo: MongoConfig,

    /// Object store configuration
    #[serde(default)]
    pub s3: S3Config,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    #[serde(default)]
    pub uri: String,

    /// Server selection and connect timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

/// Object store configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// Target bucket
    #[serde(default)]
    pub bucket: String,

    /// Region for the S3 client (provider chain default when unset)
    #[serde(default)]
    pub region: Option<String>,

    /// Static access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Static secret access key
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// S3-compatible endpoint override
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,

    /// One JSON object per line, for CloudWatch queries
    Json,
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_app_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            timeout: default_timeout(),
            app_name: default_app_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Arguments
    /// * `file` - Explicit config file path; falls back to `EXPORTER_CONFIG`
    ///
    /// # Returns
    /// * `Result<Config>` - Validated configuration or error
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    /// Load configuration using a custom variable lookup
    ///
    /// Tests pass a closure over a map instead of touching the process
    /// environment.
    pub fn load_with<F>(file: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_path = file
            .map(Path::to_path_buf)
            .or_else(|| non_empty(lookup(ENV_CONFIG_FILE)).map(PathBuf::from));

        let mut config = match file_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            _ => ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Overlay environment variables onto this configuration
    pub fn apply_env<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = non_empty(lookup(ENV_MONGODB_URI)) {
            self.mongo.uri = uri;
        }
        if let Some(bucket) = non_empty(lookup(ENV_BUCKET)) {
            self.s3.bucket = bucket;
        }
        if let Some(region) = non_empty(lookup(ENV_REGION)) {
            self.s3.region = Some(region);
        }
        if let Some(key) = non_empty(lookup(ENV_ACCESS_KEY_ID)) {
            self.s3.access_key_id = Some(key);
        }
        if let Some(secret) = non_empty(lookup(ENV_SECRET_ACCESS_KEY)) {
            self.s3.secret_access_key = Some(secret);
        }
        if let Some(endpoint) = non_empty(lookup(ENV_ENDPOINT_URL)) {
            self.s3.endpoint_url = Some(endpoint);
        }
        if let Some(level) = non_empty(lookup(ENV_LOG_LEVEL)) {
            self.logging.level = LogLevel::parse(&level)?;
        }
        if let Some(format) = non_empty(lookup(ENV_LOG_FORMAT)) {
            self.logging.format = LogFormat::parse(&format)?;
        }
        if let Some(flag) = non_empty(lookup(ENV_LOG_TIMESTAMPS)) {
            self.logging.timestamps = parse_bool(ENV_LOG_TIMESTAMPS, &flag)?;
        }
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        self.mongo.validate_uri()?;

        if self.s3.bucket.trim().is_empty() {
            return Err(ConfigError::MissingField(ENV_BUCKET.to_string()).into());
        }

        match (&self.s3.access_key_id, &self.s3.secret_access_key) {
            (Some(_), None) => {
                Err(ConfigError::MissingField(ENV_SECRET_ACCESS_KEY.to_string()).into())
            }
            (None, Some(_)) => Err(ConfigError::MissingField(ENV_ACCESS_KEY_ID.to_string()).into()),
            _ => Ok(()),
        }
    }
}

impl MongoConfig {
    /// Connect and server selection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Check that the connection URI is present and has a MongoDB scheme
    pub fn validate_uri(&self) -> Result<()> {
        let uri = self.uri.trim();
        if uri.is_empty() {
            return Err(ConfigError::MissingField(ENV_MONGODB_URI.to_string()).into());
        }
        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            return Err(ConfigError::InvalidValue {
                field: ENV_MONGODB_URI.to_string(),
                value: redact_uri(uri),
            }
            .into());
        }
        Ok(())
    }
}

impl S3Config {
    /// Whether static credentials were supplied
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitive
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidValue {
                field: ENV_LOG_LEVEL.to_string(),
                value: value.to_string(),
            }
            .into()),
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl LogFormat {
    /// Parse a format name, case-insensitive
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                field: ENV_LOG_FORMAT.to_string(),
                value: value.to_string(),
            }
            .into()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}

/// Hide the password portion of a connection string for error messages
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    match rest.rsplit_once('@') {
        Some((userinfo, host)) => {
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:****@{host}")
        }
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_MONGODB_URI, "mongodb://localhost:27017"),
            (ENV_BUCKET, "config-backups"),
        ]
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mongo.timeout, 30);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.s3.region.is_none());
    }

    #[test]
    fn test_load_from_env() {
        let mut env = minimal_env();
        env.push((ENV_REGION, "eu-west-1"));
        env.push((ENV_ACCESS_KEY_ID, "AKIAEXAMPLE"));
        env.push((ENV_SECRET_ACCESS_KEY, "secret"));

        let config = Config::load_with(None, lookup_from(&env)).unwrap();
        assert_eq!(config.mongo.uri, "mongodb://localhost:27017");
        assert_eq!(config.s3.bucket, "config-backups");
        assert_eq!(config.s3.region.as_deref(), Some("eu-west-1"));
        assert!(config.s3.has_static_credentials());
    }

    #[test]
    fn test_missing_uri_rejected() {
        let err = Config::load_with(None, lookup_from(&[(ENV_BUCKET, "b")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MONGODB_URI));
    }

    #[test]
    fn test_missing_bucket_rejected() {
        let env = [(ENV_MONGODB_URI, "mongodb://localhost")];
        let err = Config::load_with(None, lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains(ENV_BUCKET));
    }

    #[test]
    fn test_half_credentials_rejected() {
        let mut env = minimal_env();
        env.push((ENV_ACCESS_KEY_ID, "AKIAEXAMPLE"));
        let err = Config::load_with(None, lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains(ENV_SECRET_ACCESS_KEY));
    }

    #[test]
    fn test_invalid_scheme_is_redacted() {
        let env = [
            (ENV_MONGODB_URI, "postgres://admin:hunter2@db:5432"),
            (ENV_BUCKET, "b"),
        ];
        let err = Config::load_with(None, lookup_from(&env)).unwrap_err();
        let msg = err.to_string();
        assert!(!msg.contains("hunter2"));
        assert!(msg.contains("admin:****@db:5432"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml(
            r#"
            [mongo]
            uri = "mongodb://file-host:27017"
            timeout = 5

            [s3]
            bucket = "file-bucket"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.mongo.timeout, 5);
        assert_eq!(config.logging.format, LogFormat::Json);

        config
            .apply_env(&lookup_from(&[(ENV_BUCKET, "env-bucket")]))
            .unwrap();
        assert_eq!(config.s3.bucket, "env-bucket");
        assert_eq!(config.mongo.uri, "mongodb://file-host:27017");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut env = minimal_env();
        env.push((ENV_REGION, "   "));
        let config = Config::load_with(None, lookup_from(&env)).unwrap();
        assert!(config.s3.region.is_none());
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::load_with(
            Some(Path::new("/nonexistent/exporter.toml")),
            lookup_from(&minimal_env()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_log_settings_from_env() {
        let mut env = minimal_env();
        env.push((ENV_LOG_LEVEL, "WARN"));
        env.push((ENV_LOG_FORMAT, "json"));
        env.push((ENV_LOG_TIMESTAMPS, "false"));
        let config = Config::load_with(None, lookup_from(&env)).unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.timestamps);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut env = minimal_env();
        env.push((ENV_LOG_LEVEL, "loud"));
        assert!(Config::load_with(None, lookup_from(&env)).is_err());
    }

    #[test]
    fn test_secret_not_in_debug() {
        let s3 = S3Config {
            secret_access_key: Some("very-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", s3).contains("very-secret"));
    }

    #[test]
    fn test_redact_uri_without_credentials() {
        assert_eq!(redact_uri("mongodb://localhost"), "mongodb://localhost");
    }

    #[test]
    fn test_connection_timeout() {
        let config = Config::default();
        assert_eq!(config.mongo.connection_timeout(), Duration::from_secs(30));

        let config = Config::from_toml("[mongo]\ntimeout = 5\n").unwrap();
        assert_eq!(config.mongo.connection_timeout(), Duration::from_secs(5));
    }
}

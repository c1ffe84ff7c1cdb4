use std::fmt;

/// Crate-wide `Result` type using [`ExportError`] as the error.
///
/// Re-exported by the parent `error` module and used throughout the crate
/// for fallible operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Top-level error type for export runs.
///
/// Wraps the more specific error kinds so a single error type can flow
/// through the exporter, the handler and the binary.
#[derive(Debug)]
pub enum ExportError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Configuration errors.
    Config(ConfigError),

    /// Artifact serialization errors.
    Serialization(SerializationError),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// The source was used after being closed.
    NotConnected,

    /// Ping command failed.
    PingFailed(String),

    /// Listing collections failed.
    ListFailed(String),

    /// Reading a collection failed.
    FetchFailed { collection: String, message: String },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Artifact serialization errors.
#[derive(Debug)]
pub enum SerializationError {
    /// JSON encoding of a collection failed.
    Encode { collection: String, message: String },
}

/// Object store errors.
///
/// `message` carries the provider-supplied text when the provider sent one.
#[derive(Debug)]
pub enum StorageError {
    /// The provider rejected or failed the upload.
    PutFailed {
        key: String,
        code: Option<String>,
        message: String,
    },
}

impl StorageError {
    /// Provider-supplied message, without the key or code decoration.
    pub fn provider_message(&self) -> &str {
        match self {
            StorageError::PutFailed { message, .. } => message,
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Connection(e) => write!(f, "Connection error: {e}"),
            ExportError::Config(e) => write!(f, "Configuration error: {e}"),
            ExportError::Serialization(e) => write!(f, "Serialization error: {e}"),
            ExportError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
            ConnectionError::ListFailed(msg) => write!(f, "Failed to list collections: {msg}"),
            ConnectionError::FetchFailed {
                collection,
                message,
            } => write!(f, "Failed to read collection '{collection}': {message}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::Encode {
                collection,
                message,
            } => write!(f, "Failed to encode collection '{collection}': {message}"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PutFailed {
                key,
                code: Some(code),
                message,
            } => write!(f, "Upload of '{key}' failed ({code}): {message}"),
            StorageError::PutFailed {
                key,
                code: None,
                message,
            } => write!(f, "Upload of '{key}' failed: {message}"),
        }
    }
}

impl std::error::Error for ExportError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for SerializationError {}
impl std::error::Error for StorageError {}

/* ========================= Conversions to ExportError ========================= */

impl From<ConnectionError> for ExportError {
    fn from(err: ConnectionError) -> Self {
        ExportError::Connection(err)
    }
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        ExportError::Config(err)
    }
}

impl From<SerializationError> for ExportError {
    fn from(err: SerializationError) -> Self {
        ExportError::Serialization(err)
    }
}

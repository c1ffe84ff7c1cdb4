//! MongoDB to S3 export library
//!
//! Exports every collection of a MongoDB database to an S3 bucket, one JSON
//! object per collection. The binary wraps this as an AWS Lambda function.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing
//! - `config`: Configuration from environment and TOML
//! - `connection`: MongoDB connection management
//! - `error`: Error types and handling
//! - `export`: Export coordinator and run reports
//! - `formatter`: BSON to JSON artifact encoding
//! - `handler`: Lambda entry point
//! - `storage`: Object store abstraction and S3 implementation
//!
//! # Example
//!
//! ```no_run
//! use mongo_s3_export::{Config, handler::ExportFunction};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let function = ExportFunction::from_config(&config).await;
//!
//!     let report = function.invoke().await;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod formatter;
pub mod handler;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use connection::ConnectionManager;
pub use error::{ExportError, Result};
pub use export::{ExportCoordinator, ExportReport};
pub use formatter::ArtifactEncoder;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

//! Error handling for export runs.
//!
//! This module provides:
//! - A crate-wide error enum with typed sub-kinds for connection,
//!   configuration, serialization and storage failures
//! - Structured information extraction from MongoDB driver errors, rendered
//!   as single-line JSON for log output
//!
//! # Example
//!
//! ```rust,no_run
//! use mongo_s3_export::error::{ExportError, Result};
//! use mongo_s3_export::error::mongo::extract_error_info;
//!
//! fn describe(err: &mongodb::error::Error) -> Result<String> {
//!     let info = extract_error_info(err);
//!     info.to_json_compact()
//!         .map_err(|e| ExportError::Generic(e.to_string()))
//! }
//! ```

pub mod kinds;
pub mod mongo;

pub use kinds::{
    ConfigError, ConnectionError, ExportError, Result, SerializationError, StorageError,
};
pub use mongo::{ErrorInfo, extract_error_info};

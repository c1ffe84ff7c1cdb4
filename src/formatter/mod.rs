//! Artifact formatting for exported collections
//!
//! - `bson_utils`: BSON to JSON value conversion strategies
//! - `json`: artifact body encoding

pub mod bson_utils;
pub mod json;

pub use bson_utils::{BsonConverter, StringCoercingConverter};
pub use json::{ARTIFACT_CONTENT_TYPE, ArtifactEncoder};

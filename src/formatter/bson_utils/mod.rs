//! BSON value conversion utilities
//!
//! Converts BSON documents to `serde_json::Value` for artifact output.
//!
//! # Design
//!
//! The module uses a strategy pattern: `BsonConverter` is the common trait,
//! `BsonJsonConverter` supplies the kind dispatch, and strategies override
//! only the per-kind hooks.

mod converter;
mod helpers;
mod strategies;

pub use converter::{BsonConverter, BsonJsonConverter};
pub use helpers::{binary_as_uuid, binary_to_base64, datetime_to_string};
pub use strategies::StringCoercingConverter;

#[cfg(test)]
mod tests;

//! Core converter traits for BSON value conversion
//!
//! This module defines the traits that all BSON converters must implement.

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp};
use mongodb::bson::oid::ObjectId;
use serde_json::Value as JsonValue;

/// Core trait for BSON value conversion
///
/// Allows different conversion strategies to be plugged into the artifact
/// encoder.
pub trait BsonConverter {
    /// Output type of the conversion
    type Output;

    /// Convert a BSON value to the output type
    ///
    /// # Arguments
    /// * `value` - BSON value to convert
    ///
    /// # Returns
    /// Converted value in the target format
    fn convert(&self, value: &Bson) -> Self::Output;

    /// Convert a BSON document
    ///
    /// # Arguments
    /// * `doc` - BSON document to convert
    ///
    /// # Returns
    /// Converted document representation
    fn convert_document(&self, doc: &Document) -> Self::Output;
}

/// Trait for JSON conversion
///
/// JSON-native BSON kinds are mapped in the provided `convert_to_json`;
/// everything else is delegated to the per-kind hooks.
pub trait BsonJsonConverter {
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue;
    fn convert_datetime(&self, dt: &DateTime) -> JsonValue;
    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue;
    fn convert_double(&self, f: f64) -> JsonValue;
    fn convert_binary(&self, bin: &Binary) -> JsonValue;
    fn convert_regex(&self, regex: &Regex) -> JsonValue;
    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue;
    fn convert_other(&self, value: &Bson) -> JsonValue;

    /// Convert a document, keeping field order
    fn convert_document_to_json(&self, doc: &Document) -> JsonValue {
        let map = doc
            .iter()
            .map(|(key, value)| (key.clone(), self.convert_to_json(value)))
            .collect::<serde_json::Map<_, _>>();
        JsonValue::Object(map)
    }

    /// Convert an array element by element
    fn convert_array(&self, arr: &[Bson]) -> JsonValue {
        JsonValue::Array(arr.iter().map(|v| self.convert_to_json(v)).collect())
    }

    /// Convert BSON value to JSON (provided implementation)
    fn convert_to_json(&self, value: &Bson) -> JsonValue {
        match value {
            Bson::String(s) => JsonValue::String(s.clone()),
            Bson::Int32(n) => JsonValue::Number((*n).into()),
            Bson::Int64(n) => JsonValue::Number((*n).into()),
            Bson::Double(f) => self.convert_double(*f),
            Bson::Boolean(b) => JsonValue::Bool(*b),
            Bson::Null | Bson::Undefined => JsonValue::Null,
            Bson::ObjectId(oid) => self.convert_object_id(oid),
            Bson::DateTime(dt) => self.convert_datetime(dt),
            Bson::Decimal128(d) => self.convert_decimal128(d),
            Bson::Array(arr) => self.convert_array(arr),
            Bson::Document(doc) => self.convert_document_to_json(doc),
            Bson::Binary(bin) => self.convert_binary(bin),
            Bson::RegularExpression(regex) => self.convert_regex(regex),
            Bson::Timestamp(ts) => self.convert_timestamp(ts),
            _ => self.convert_other(value),
        }
    }
}

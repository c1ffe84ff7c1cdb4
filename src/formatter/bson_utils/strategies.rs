//! Strategy implementations for BSON conversion
//!
//! `StringCoercingConverter` is the artifact strategy: JSON-native kinds stay
//! native, everything else becomes its string form.

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};
use serde_json::Value as JsonValue;

use super::converter::{BsonConverter, BsonJsonConverter};
use super::helpers::*;

/// Converter that coerces non-JSON-native values to strings
///
/// Output is always valid JSON: non-finite doubles are strings too.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCoercingConverter;

impl StringCoercingConverter {
    /// Create a new converter
    pub fn new() -> Self {
        Self
    }
}

impl BsonConverter for StringCoercingConverter {
    type Output = JsonValue;

    fn convert(&self, value: &Bson) -> JsonValue {
        self.convert_to_json(value)
    }

    fn convert_document(&self, doc: &Document) -> JsonValue {
        self.convert_document_to_json(doc)
    }
}

impl BsonJsonConverter for StringCoercingConverter {
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue {
        JsonValue::String(oid.to_hex())
    }

    fn convert_datetime(&self, dt: &DateTime) -> JsonValue {
        JsonValue::String(datetime_to_string(dt))
    }

    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue {
        JsonValue::String(d.to_string())
    }

    fn convert_double(&self, f: f64) -> JsonValue {
        if let Some(text) = non_finite_to_string(f) {
            return JsonValue::String(text.to_string());
        }
        serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(f.to_string()))
    }

    fn convert_binary(&self, bin: &Binary) -> JsonValue {
        JsonValue::String(binary_as_uuid(bin).unwrap_or_else(|| binary_to_base64(bin)))
    }

    fn convert_regex(&self, regex: &Regex) -> JsonValue {
        JsonValue::String(format!("/{}/{}", regex.pattern, regex.options))
    }

    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue {
        JsonValue::String(format!("Timestamp({}, {})", ts.time, ts.increment))
    }

    fn convert_other(&self, value: &Bson) -> JsonValue {
        let text = match value {
            Bson::JavaScriptCode(code) => code.clone(),
            Bson::JavaScriptCodeWithScope(code) => code.code.clone(),
            Bson::Symbol(symbol) => symbol.clone(),
            Bson::MinKey => "MinKey()".to_string(),
            Bson::MaxKey => "MaxKey()".to_string(),
            other => format!("{:?}", other),
        };
        JsonValue::String(text)
    }
}

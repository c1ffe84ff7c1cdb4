//! JSON artifact encoding for MongoDB collections
//!
//! A collection is encoded as one JSON array on a single line:
//! - Items separated by `", "`, keys and values by `": "`
//! - Non-ASCII characters escaped as `\uXXXX`, so the body is plain ASCII
//! - Non-JSON-native BSON values coerced to strings by
//!   [`StringCoercingConverter`]
//!
//! Encoding is deterministic, so re-exporting unchanged data yields
//! byte-identical artifacts.

use std::io;

use mongodb::bson::Document;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::{Formatter, Serializer};

use super::bson_utils::{BsonConverter, StringCoercingConverter};
use crate::error::{Result, SerializationError};

/// MIME type written alongside every artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/json";

/// Encoder turning a collection's documents into an artifact body
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactEncoder {
    converter: StringCoercingConverter,
}

impl ArtifactEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {
            converter: StringCoercingConverter::new(),
        }
    }

    /// Encode all documents of a collection as a JSON array
    ///
    /// # Arguments
    /// * `collection` - Collection name, used in error messages
    /// * `docs` - Documents in cursor order
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Artifact body or serialization error
    pub fn encode(&self, collection: &str, docs: &[Document]) -> Result<Vec<u8>> {
        let values: Vec<JsonValue> = docs
            .iter()
            .map(|doc| self.converter.convert_document(doc))
            .collect();

        to_artifact_bytes(&values).map_err(|e| {
            SerializationError::Encode {
                collection: collection.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Serialize any value with the artifact's separators and escaping
pub fn to_artifact_bytes<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Single-line formatter with spaced separators and ASCII-only strings
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.bytes().all(|b| (b' '..=b'~').contains(&b)) {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            // DEL is escaped along with non-ASCII.
            if ch.is_ascii() && ch != '\u{7f}' {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

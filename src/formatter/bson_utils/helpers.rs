//! Helper functions for BSON value conversion
//!
//! String forms used when a BSON value has no native JSON representation.

use chrono::{DateTime as ChronoDateTime, Timelike};
use mongodb::bson::{Binary, DateTime, spec::BinarySubtype};
use uuid::Uuid;

/// Convert DateTime to a `YYYY-MM-DD HH:MM:SS[.ffffff]` string in UTC
///
/// The fractional part is only written when it is non-zero. Values outside
/// chrono's range fall back to the millisecond timestamp.
///
/// # Arguments
/// * `dt` - BSON DateTime value
pub fn datetime_to_string(dt: &DateTime) -> String {
    let millis = dt.timestamp_millis();
    match ChronoDateTime::from_timestamp_millis(millis) {
        Some(utc) if utc.nanosecond() == 0 => utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        Some(utc) => utc.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => millis.to_string(),
    }
}

/// Convert Binary data to Base64 string
///
/// # Arguments
/// * `bin` - BSON Binary value
pub fn binary_to_base64(bin: &Binary) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(&bin.bytes)
}

/// Hyphenated UUID for binaries carrying a UUID subtype
///
/// Legacy subtype 3 bytes are rendered as stored.
///
/// # Returns
/// `None` for other subtypes or when the payload is not 16 bytes
pub fn binary_as_uuid(bin: &Binary) -> Option<String> {
    match bin.subtype {
        BinarySubtype::Uuid | BinarySubtype::UuidOld => Uuid::from_slice(&bin.bytes)
            .ok()
            .map(|uuid| uuid.hyphenated().to_string()),
        _ => None,
    }
}

/// String form of a non-finite double
///
/// # Returns
/// `None` for finite values, which stay JSON numbers
pub fn non_finite_to_string(f: f64) -> Option<&'static str> {
    if f.is_nan() {
        Some("nan")
    } else if f == f64::INFINITY {
        Some("inf")
    } else if f == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

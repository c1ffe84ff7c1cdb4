//! Tests for BSON conversion utilities

use super::*;
use mongodb::bson::{
    Binary, Bson, DateTime, Decimal128, JavaScriptCodeWithScope, Regex, Timestamp, doc,
    oid::ObjectId, spec::BinarySubtype,
};
use serde_json::{Value as JsonValue, json};

// ===== Helper Function Tests =====

#[test]
fn test_datetime_whole_seconds() {
    let dt = DateTime::from_millis(1_700_000_000_000);
    assert_eq!(datetime_to_string(&dt), "2023-11-14 22:13:20");
}

#[test]
fn test_datetime_with_millis() {
    let dt = DateTime::from_millis(1_700_000_000_123);
    assert_eq!(datetime_to_string(&dt), "2023-11-14 22:13:20.123000");
}

#[test]
fn test_datetime_out_of_range_falls_back_to_millis() {
    assert_eq!(datetime_to_string(&DateTime::MAX), i64::MAX.to_string());
}

#[test]
fn test_uuid_binary() {
    let bin = Binary {
        subtype: BinarySubtype::Uuid,
        bytes: (0u8..16).collect(),
    };
    assert_eq!(
        binary_as_uuid(&bin).as_deref(),
        Some("00010203-0405-0607-0809-0a0b0c0d0e0f")
    );
}

#[test]
fn test_uuid_subtype_with_wrong_length() {
    let bin = Binary {
        subtype: BinarySubtype::Uuid,
        bytes: vec![1, 2, 3],
    };
    assert!(binary_as_uuid(&bin).is_none());
}

#[test]
fn test_generic_binary_base64() {
    let bin = Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![0x01, 0x02, 0x03, 0xff],
    };
    assert!(binary_as_uuid(&bin).is_none());
    assert_eq!(binary_to_base64(&bin), "AQID/w==");
}

// ===== StringCoercingConverter Tests =====

#[test]
fn test_native_values_stay_native() {
    let converter = StringCoercingConverter::new();
    assert_eq!(converter.convert(&Bson::String("x".into())), json!("x"));
    assert_eq!(converter.convert(&Bson::Int32(7)), json!(7));
    assert_eq!(converter.convert(&Bson::Int64(1 << 40)), json!(1_i64 << 40));
    assert_eq!(converter.convert(&Bson::Double(2.5)), json!(2.5));
    assert_eq!(converter.convert(&Bson::Boolean(false)), json!(false));
    assert_eq!(converter.convert(&Bson::Null), JsonValue::Null);
    assert_eq!(converter.convert(&Bson::Undefined), JsonValue::Null);
}

#[test]
fn test_object_id_to_hex() {
    let converter = StringCoercingConverter::new();
    let oid = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap();
    assert_eq!(
        converter.convert(&Bson::ObjectId(oid)),
        json!("65a1b2c3d4e5f60718293a4b")
    );
}

#[test]
fn test_decimal128_to_string() {
    let converter = StringCoercingConverter::new();
    let d = Decimal128::from_bytes([0u8; 16]);
    let expected = d.to_string();
    let value = converter.convert(&Bson::Decimal128(d));
    assert_eq!(value, JsonValue::String(expected));
}

#[test]
fn test_non_finite_doubles_become_strings() {
    let converter = StringCoercingConverter::new();
    assert_eq!(converter.convert(&Bson::Double(f64::NAN)), json!("nan"));
    assert_eq!(converter.convert(&Bson::Double(f64::INFINITY)), json!("inf"));
    assert_eq!(
        converter.convert(&Bson::Double(f64::NEG_INFINITY)),
        json!("-inf")
    );
}

#[test]
fn test_timestamp_and_regex() {
    let converter = StringCoercingConverter::new();
    let ts = Timestamp {
        time: 1_700_000_000,
        increment: 3,
    };
    assert_eq!(
        converter.convert(&Bson::Timestamp(ts)),
        json!("Timestamp(1700000000, 3)")
    );

    let regex = Regex {
        pattern: "^abc".to_string(),
        options: "i".to_string(),
    };
    assert_eq!(
        converter.convert(&Bson::RegularExpression(regex)),
        json!("/^abc/i")
    );
}

#[test]
fn test_code_symbol_and_keys() {
    let converter = StringCoercingConverter::new();
    assert_eq!(
        converter.convert(&Bson::JavaScriptCode("return 1".into())),
        json!("return 1")
    );
    let scoped = JavaScriptCodeWithScope {
        code: "return x".to_string(),
        scope: doc! { "x": 1 },
    };
    assert_eq!(
        converter.convert(&Bson::JavaScriptCodeWithScope(scoped)),
        json!("return x")
    );
    assert_eq!(converter.convert(&Bson::Symbol("sym".into())), json!("sym"));
    assert_eq!(converter.convert(&Bson::MinKey), json!("MinKey()"));
    assert_eq!(converter.convert(&Bson::MaxKey), json!("MaxKey()"));
}

#[test]
fn test_nested_document_keeps_field_order() {
    let converter = StringCoercingConverter::new();
    let doc = doc! {
        "zeta": 1,
        "alpha": { "when": DateTime::from_millis(0), "tags": ["a", 2] },
    };
    let value = converter.convert_document(&doc);
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
    assert_eq!(value["alpha"]["when"], json!("1970-01-01 00:00:00"));
    assert_eq!(value["alpha"]["tags"], json!(["a", 2]));
}

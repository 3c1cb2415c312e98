//! Canonical CBOR encoding for deterministic serialization.
//!
//! Any `Serialize` value is first lowered to a [`ciborium::value::Value`] and
//! then written following RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Floats always as 64-bit IEEE 754; NaN and infinities are rejected
//!
//! Signatures are computed over these bytes, so two envelopes holding the
//! same data sign identically no matter how their maps were ordered in
//! memory.

use ciborium::value::Value;

use crate::error::CoreError;

/// Domain separation prefix for envelope signatures.
pub const SIGN_DOMAIN: &[u8] = b"calcstack/envelope-sig/v1";

/// Encode any serializable value to canonical CBOR bytes.
pub fn canonical_bytes<T: serde::Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    let value = Value::serialized(value).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value)?;
    Ok(buf)
}

/// Construct the signed message for an owner over canonical envelope bytes.
///
/// Format: SIGN_DOMAIN || len(owner) as u32 BE || owner || canonical
pub fn signing_message(owner: &str, canonical: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(SIGN_DOMAIN.len() + 4 + owner.len() + canonical.len());
    msg.extend_from_slice(SIGN_DOMAIN);
    msg.extend_from_slice(&(owner.len() as u32).to_be_bytes());
    msg.extend_from_slice(owner.as_bytes());
    msg.extend_from_slice(canonical);
    msg
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Float(f) => encode_float(buf, *f)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Tag(tag, _) => {
            return Err(CoreError::EncodingError(format!(
                "tagged value {tag} not supported in canonical encoding"
            )))
        }
        _ => {
            return Err(CoreError::EncodingError(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a float as a 64-bit IEEE 754 value (major type 7, 0xfb).
fn encode_float(buf: &mut Vec<u8>, f: f64) -> Result<(), CoreError> {
    if !f.is_finite() {
        return Err(CoreError::NonFiniteFloat(f));
    }
    // -0.0 and 0.0 compare equal and must sign identically
    let f = if f == 0.0 { 0.0 } else { f };
    buf.push(0xfb);
    buf.extend_from_slice(&f.to_bits().to_be_bytes());
    Ok(())
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CoreError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        key_value_pairs.push((key_buf, v));
    }

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if key_value_pairs.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(CoreError::EncodingError("duplicate map key".into()));
    }

    encode_uint(buf, 5, key_value_pairs.len() as u64);

    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Point {
        x: f64,
        y: f64,
    }

    #[test]
    fn test_canonical_encoding_deterministic() {
        let p = Point { x: 20.0, y: -3.0 };
        assert_eq!(canonical_bytes(&p).unwrap(), canonical_bytes(&p).unwrap());
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a = json!({"x": 1.5, "y": 2.5, "nested": {"b": 1, "a": 2}});
        let b = json!({"nested": {"a": 2, "b": 1}, "y": 2.5, "x": 1.5});
        assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
    }

    #[test]
    fn test_struct_matches_json_value() {
        let typed = Point { x: 13.0, y: 3.0 };
        let untyped = serde_json::to_value(&typed).unwrap();
        assert_eq!(
            canonical_bytes(&typed).unwrap(),
            canonical_bytes(&untyped).unwrap()
        );
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let p = Point { x: f64::INFINITY, y: 0.0 };
        assert!(matches!(canonical_bytes(&p), Err(CoreError::NonFiniteFloat(_))));

        let p = Point { x: f64::NAN, y: 0.0 };
        assert!(matches!(canonical_bytes(&p), Err(CoreError::NonFiniteFloat(_))));
    }

    #[test]
    fn test_negative_zero_normalized() {
        let a = Point { x: -0.0, y: 1.0 };
        let b = Point { x: 0.0, y: 1.0 };
        assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
    }

    #[test]
    fn test_float_encoding() {
        let mut buf = Vec::new();
        encode_float(&mut buf, 1.0).unwrap();
        assert_eq!(buf, vec![0xfb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        // 0-23: single byte
        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        // 24-255: two bytes
        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        // 256-65535: three bytes
        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);
    }

    #[test]
    fn test_map_key_ordering() {
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Integer(8.into()), Value::Integer(80.into())),
            (Value::Integer(0.into()), Value::Integer(0.into())),
            (Value::Integer(5.into()), Value::Integer(50.into())),
        ];
        encode_map_canonical(&mut buf, &entries).unwrap();

        assert_eq!(buf[0], 0xa3);
        // Keys should be in order: 0, 5, 8
        assert_eq!(buf[1], 0x00);
        assert_eq!(buf[2], 0x00);
        assert_eq!(buf[3], 0x05);
        assert_eq!(buf[4], 0x18);
        assert_eq!(buf[5], 50);
        assert_eq!(buf[6], 0x08);
        assert_eq!(buf[7], 0x18);
        assert_eq!(buf[8], 80);
    }

    #[test]
    fn test_signing_message_separates_owners() {
        let canonical = canonical_bytes(&json!({"a": 1})).unwrap();
        let m1 = signing_message("ab", &canonical);
        let m2 = signing_message("a", &canonical);
        assert_ne!(m1, m2);
        assert!(m1.starts_with(SIGN_DOMAIN));
    }
}

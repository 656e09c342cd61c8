//! Stored Value Module
//!
//! Payloads accepted by [`ValueCache::store`](crate::cache::ValueCache::store).

use std::fmt;

// == Stored Value ==
/// A text, binary, integer, or floating-point payload.
///
/// Every variant is written to the store as bytes: text as UTF-8, binary
/// unchanged, numbers as decimal ASCII. The `Debug` form is what call
/// history records: `"text"`, `b"bytes"`, `42`, `3.5`.
#[derive(Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl StoredValue {
    /// Encodes the value the way it is written to the store.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            StoredValue::Text(text) => text.into_bytes(),
            StoredValue::Bytes(bytes) => bytes,
            StoredValue::Int(n) => n.to_string().into_bytes(),
            StoredValue::Float(x) => format!("{x:?}").into_bytes(),
        }
    }
}

impl fmt::Debug for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Text(text) => write!(f, "{text:?}"),
            StoredValue::Bytes(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            StoredValue::Int(n) => write!(f, "{n}"),
            StoredValue::Float(x) => write!(f, "{x:?}"),
        }
    }
}

// == Conversions ==
impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(value: Vec<u8>) -> Self {
        StoredValue::Bytes(value)
    }
}

impl From<&[u8]> for StoredValue {
    fn from(value: &[u8]) -> Self {
        StoredValue::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for StoredValue {
    fn from(value: &[u8; N]) -> Self {
        StoredValue::Bytes(value.to_vec())
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Int(value)
    }
}

impl From<i32> for StoredValue {
    fn from(value: i32) -> Self {
        StoredValue::Int(value.into())
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding() {
        assert_eq!(StoredValue::from("bar").into_bytes(), b"bar".to_vec());
        assert_eq!(StoredValue::from(b"\x00\xff").into_bytes(), vec![0x00, 0xff]);
        assert_eq!(StoredValue::from(123).into_bytes(), b"123".to_vec());
        assert_eq!(StoredValue::from(-7i64).into_bytes(), b"-7".to_vec());
        assert_eq!(StoredValue::from(1.0).into_bytes(), b"1.0".to_vec());
        assert_eq!(StoredValue::from(3.25).into_bytes(), b"3.25".to_vec());
    }

    #[test]
    fn test_debug_representation() {
        assert_eq!(format!("{:?}", StoredValue::from("foo")), "\"foo\"");
        assert_eq!(format!("{:?}", StoredValue::from(b"first")), "b\"first\"");
        assert_eq!(format!("{:?}", StoredValue::from(b"a\"\n")), "b\"a\\\"\\n\"");
        assert_eq!(format!("{:?}", StoredValue::from(42)), "42");
        assert_eq!(format!("{:?}", StoredValue::from(2.5)), "2.5");
    }

    #[test]
    fn test_argument_tuple_representation() {
        let args = (StoredValue::from("foo"),);
        assert_eq!(format!("{args:?}"), "(\"foo\",)");
    }
}

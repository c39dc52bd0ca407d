//! Encoding of cache values to store bytes.

use cachedeck_config::ValueFormat;
use cachedeck_core::{CacheDeckError, CacheDeckResult};
use serde_json::Value;

/// Converts cache values to and from the bytes kept in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueCodec {
    format: ValueFormat,
}

impl ValueCodec {
    /// Creates a codec for `format`.
    #[must_use]
    pub const fn new(format: ValueFormat) -> Self {
        Self { format }
    }

    /// Encodes a value for storage.
    pub fn encode(&self, value: &Value) -> CacheDeckResult<Vec<u8>> {
        match (self.format, value) {
            (ValueFormat::String, Value::String(text)) => Ok(text.as_bytes().to_vec()),
            _ => Ok(serde_json::to_vec(value)?),
        }
    }

    /// Decodes stored bytes.
    pub fn decode(&self, bytes: &[u8]) -> CacheDeckResult<Value> {
        match self.format {
            ValueFormat::Json => Ok(serde_json::from_slice(bytes)?),
            ValueFormat::String => String::from_utf8(bytes.to_vec())
                .map(Value::String)
                .map_err(|e| {
                    CacheDeckError::Serialization(format!("Stored value is not UTF-8: {}", e))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_format() {
        let codec = ValueCodec::new(ValueFormat::Json);
        assert_eq!(codec.encode(&json!("shipped")).unwrap(), b"\"shipped\"".to_vec());
        assert_eq!(codec.decode(b"\"shipped\"").unwrap(), json!("shipped"));
        assert_eq!(
            codec.decode(br#"{"qty":2,"tags":["a"]}"#).unwrap(),
            json!({"qty": 2, "tags": ["a"]})
        );
    }

    #[test]
    fn test_json_format_rejects_garbage() {
        let codec = ValueCodec::default();
        let err = codec.decode(b"not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_string_format() {
        let codec = ValueCodec::new(ValueFormat::String);
        assert_eq!(codec.encode(&json!("shipped")).unwrap(), b"shipped".to_vec());
        assert_eq!(codec.encode(&json!({"a": 1})).unwrap(), br#"{"a":1}"#.to_vec());
        assert_eq!(codec.decode(b"shipped").unwrap(), json!("shipped"));
        assert!(codec.decode(&[0xff]).is_err());
    }
}

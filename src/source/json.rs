use std::io::Read;

use serde_json::Value;

use super::{child_path, SourceError, ValueEntry, ValueSource};
use crate::value::Number;

const INLINE: &str = "<inline>";

/// A JSON document whose root is an object.
///
/// Object keys become path segments and array positions become decimal
/// indices, so `{"a": ["x", 5]}` yields `a.0 = "x"` and `a.1 = 5`.
/// Booleans and `null` are rejected.
#[derive(Debug, Clone)]
pub struct JsonSource {
    document: Value,
    origin: String,
}

impl JsonSource {
    /// Parses a JSON document from text.
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        Self::parse_from(text, INLINE)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, SourceError> {
        let document = serde_json::from_reader(reader).map_err(|source| SourceError::JsonParse {
            origin: INLINE.to_string(),
            source,
        })?;
        Ok(Self::from_value(document))
    }

    pub fn from_value(document: Value) -> Self {
        Self {
            document,
            origin: INLINE.to_string(),
        }
    }

    pub(crate) fn parse_from(text: &str, origin: &str) -> Result<Self, SourceError> {
        let document = serde_json::from_str(text).map_err(|source| SourceError::JsonParse {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self {
            document,
            origin: origin.to_string(),
        })
    }
}

impl ValueSource for JsonSource {
    fn entries(&self) -> Result<Vec<ValueEntry>, SourceError> {
        let Value::Object(root) = &self.document else {
            return Err(SourceError::RootNotObject(self.origin.clone()));
        };

        let mut entries = Vec::new();
        for (key, value) in root {
            flatten(key, value, &mut entries)?;
        }
        Ok(entries)
    }
}

fn flatten(path: &str, value: &Value, out: &mut Vec<ValueEntry>) -> Result<(), SourceError> {
    match value {
        Value::String(s) => out.push(ValueEntry::new(path, s.as_str())),
        Value::Number(n) => {
            let number = match n.as_i64() {
                Some(i) => Number::Int(i),
                None => Number::Float(n.as_f64().unwrap_or(f64::NAN)),
            };
            out.push(ValueEntry::new(path, number));
        }
        Value::Object(map) => {
            for (key, child) in map {
                flatten(&child_path(path, key), child, out)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(&child_path(path, &index.to_string()), child, out)?;
            }
        }
        Value::Bool(_) => {
            return Err(SourceError::UnsupportedValue {
                path: path.to_string(),
                kind: "boolean",
            })
        }
        Value::Null => {
            return Err(SourceError::UnsupportedValue {
                path: path.to_string(),
                kind: "null",
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use crate::{AppContext, ErrorKind};
    use std::io::Cursor;

    fn entries(json: &str) -> Vec<ValueEntry> {
        let mut entries = JsonSource::parse(json).unwrap().entries().unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    #[test]
    fn test_flatten_object() {
        assert_eq!(
            entries(r#"{"a": {"a": "foo", "b": 5}}"#),
            vec![ValueEntry::new("a.a", "foo"), ValueEntry::new("a.b", 5)]
        );
    }

    #[test]
    fn test_flatten_array() {
        assert_eq!(
            entries(r#"{"a": ["foo", 5, 1.5]}"#),
            vec![
                ValueEntry::new("a.0", "foo"),
                ValueEntry::new("a.1", 5),
                ValueEntry::new("a.2", 1.5),
            ]
        );
    }

    #[test]
    fn test_empty_containers_emit_nothing() {
        assert!(entries(r#"{"a": {}, "b": []}"#).is_empty());
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let entries = entries(r#"{"big": 18446744073709551615}"#);
        assert!(matches!(entries[0].value, Scalar::Number(Number::Float(_))));
    }

    #[test]
    fn test_booleans_and_null_rejected() {
        let result = JsonSource::parse(r#"{"a": {"flag": true}}"#).unwrap().entries();
        assert!(matches!(
            result,
            Err(SourceError::UnsupportedValue { kind: "boolean", ref path }) if path == "a.flag"
        ));

        let result = JsonSource::parse(r#"{"a": null}"#).unwrap().entries();
        assert!(matches!(result, Err(SourceError::UnsupportedValue { kind: "null", .. })));
    }

    #[test]
    fn test_root_must_be_object() {
        let result = JsonSource::parse("[1, 2]").unwrap().entries();
        assert!(matches!(result, Err(SourceError::RootNotObject(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            JsonSource::parse("{\"a\": "),
            Err(SourceError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_read_single_root_properties() {
        let mut ctx = AppContext::new();
        JsonSource::parse(r#"{"a": "foo", "b": 5}"#)
            .unwrap()
            .read_into(&mut ctx)
            .unwrap();
        assert_eq!(ctx.get_value("a").unwrap().as_string().unwrap(), "foo");
        assert_eq!(ctx.get_value("b").unwrap().as_number().unwrap(), Number::Int(5));
    }

    #[test]
    fn test_read_nested_document() {
        let mut ctx = AppContext::new();
        let source = JsonSource::from_reader(Cursor::new(r#"{"a": ["foo", 5], "b": {"c": "x"}}"#)).unwrap();
        source.read_into(&mut ctx).unwrap();

        assert!(ctx.get_value("a").unwrap().is_array());
        assert_eq!(ctx.get_value("a.0").unwrap().as_string().unwrap(), "foo");
        assert_eq!(ctx.get_value("a.1").unwrap().as_number().unwrap(), Number::Int(5));
        assert!(ctx.get_value("b").unwrap().is_object());
    }

    #[test]
    fn test_read_twice_fails_on_duplicate_path() {
        let mut ctx = AppContext::new();
        let source = JsonSource::parse(r#"{"a": 1}"#).unwrap();
        source.read_into(&mut ctx).unwrap();
        let err = source.read_into(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

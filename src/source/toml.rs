use ::toml::{Table, Value};

use super::{child_path, SourceError, ValueEntry, ValueSource};
use crate::value::Number;

/// A TOML document, flattened the same way as [`JsonSource`](super::JsonSource).
///
/// Booleans and datetimes have no leaf representation and are rejected.
#[derive(Debug, Clone)]
pub struct TomlSource {
    table: Table,
}

impl TomlSource {
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        Self::parse_from(text, "<inline>")
    }

    pub fn from_table(table: Table) -> Self {
        Self { table }
    }

    pub(crate) fn parse_from(text: &str, origin: &str) -> Result<Self, SourceError> {
        let table = ::toml::from_str(text).map_err(|source| SourceError::TomlParse {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self { table })
    }
}

impl ValueSource for TomlSource {
    fn entries(&self) -> Result<Vec<ValueEntry>, SourceError> {
        let mut entries = Vec::new();
        for (key, value) in &self.table {
            flatten(key, value, &mut entries)?;
        }
        Ok(entries)
    }
}

fn flatten(path: &str, value: &Value, out: &mut Vec<ValueEntry>) -> Result<(), SourceError> {
    let unsupported = |kind| SourceError::UnsupportedValue {
        path: path.to_string(),
        kind,
    };

    match value {
        Value::String(s) => out.push(ValueEntry::new(path, s.as_str())),
        Value::Integer(i) => out.push(ValueEntry::new(path, Number::Int(*i))),
        Value::Float(f) => out.push(ValueEntry::new(path, Number::Float(*f))),
        Value::Table(table) => {
            for (key, child) in table {
                flatten(&child_path(path, key), child, out)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(&child_path(path, &index.to_string()), child, out)?;
            }
        }
        Value::Boolean(_) => return Err(unsupported("boolean")),
        Value::Datetime(_) => return Err(unsupported("datetime")),
    }
    Ok(())
}

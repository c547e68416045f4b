use crate::value::{join_path, Number, Scalar};

use super::{SourceError, ValueEntry, ValueSource};

/// Values taken from environment variables sharing a prefix.
///
/// Variables are mapped to paths by:
/// 1. Removing the prefix and separator
/// 2. Splitting the rest on the separator
/// 3. Lower-casing each segment and joining with `.`
///
/// With prefix `APP` and separator `__`, `APP__DATABASE__PORT=5432` becomes
/// `database.port = 5432`. Values are coerced to an integer or a float when
/// they look like one; everything else stays a string.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    fn entries_from(&self, vars: impl IntoIterator<Item = (String, String)>) -> Vec<ValueEntry> {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut entries = Vec::new();

        for (key, value) in vars {
            if let Some(path_str) = key.strip_prefix(&prefix_with_sep) {
                if path_str.is_empty() {
                    continue;
                }

                let segments: Vec<String> = path_str
                    .split(&self.separator)
                    .map(|s| s.to_lowercase())
                    .collect();

                entries.push(ValueEntry::new(join_path(&segments), coerce_value(&value)));
            }
        }

        // Process environment order is unspecified.
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

impl ValueSource for EnvSource {
    fn entries(&self) -> Result<Vec<ValueEntry>, SourceError> {
        Ok(self.entries_from(std::env::vars()))
    }
}

fn coerce_value(s: &str) -> Scalar {
    // Only if it looks like an integer: optional minus, then digits
    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Number::Int(i).into();
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Number::Float(f).into();
        }
    }

    Scalar::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

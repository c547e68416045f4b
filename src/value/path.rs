//! Dotted path handling.
//!
//! A path such as `server.ports.0` addresses a location in the value tree.
//! Numeric segments are array indices, everything else is an object key.
//! Paths are case-insensitive: they are lower-cased before use.

use super::ValueError;

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = ".";

/// Joins segments into a dotted path.
pub fn join_path<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// A validated, normalised path.
#[derive(Debug, Clone)]
pub(crate) struct ValuePath {
    normalized: String,
}

impl ValuePath {
    pub(crate) fn parse(path: &str) -> Result<Self, ValueError> {
        if path.trim().is_empty() {
            return Err(ValueError::BlankPath);
        }

        let normalized = path.to_lowercase();
        if let Some(index) = normalized
            .split(PATH_SEPARATOR)
            .position(|segment| segment.trim().is_empty())
        {
            return Err(ValueError::BlankSegment {
                path: path.to_string(),
                index,
            });
        }

        Ok(Self { normalized })
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.normalized
    }

    pub(crate) fn segments(&self) -> Vec<&str> {
        self.normalized.split(PATH_SEPARATOR).collect()
    }
}

/// Returns `true` if the segment addresses an array element. Only plain
/// ASCII digits qualify, however large the number.
pub(crate) fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an index segment. `None` if it is not an index or does not fit
/// in `usize`.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if !is_index(segment) {
        return None;
    }
    segment.parse().ok()
}

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValueError {
    #[error("path must contain non-whitespace characters")]
    BlankPath,

    #[error("segment {index} of path '{path}' is blank")]
    BlankSegment { path: String, index: usize },

    #[error("path '{0}' has already been registered with a value")]
    DuplicatePath(String),

    #[error("path '{0}' starts with an array index, but the root is an object")]
    IndexAtRoot(String),

    #[error("path '{path}': segment '{segment}' requires {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        segment: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("path '{path}': index '{segment}' is out of range (at most {limit})")]
    IndexOutOfRange {
        path: String,
        segment: String,
        limit: usize,
    },

    #[error("path '{path}': slot '{segment}' is already occupied by {found}")]
    SlotOccupied {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("path '{0}' has not been registered")]
    NotFound(String),

    #[error("cannot {operation} on {found}")]
    Unsupported {
        operation: &'static str,
        found: &'static str,
    },

    #[error("cannot represent '{0}' as a number")]
    NotNumeric(String),

    #[error("failed to deserialize value at '{path}': {source}")]
    Deserialize {
        path: String,
        source: serde_json::Error,
    },
}

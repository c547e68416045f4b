use crate::bundle::BundleError;
use crate::source::SourceError;
use crate::value::ValueError;
use thiserror::Error;

/// Top-level error type for the dragon-bundle library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    #[error("bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed or duplicate path, or a path that disagrees with the tree.
    InvalidArgument,
    AlreadyRegistered,
    MissingDependency,
    NotRegistered,
    /// The operation does not apply to this node or document value.
    UnsupportedOperation,
    /// A value could not be converted to the requested type.
    TypeConversion,
    Io,
    Parse,
    Other,
}

impl Error {
    /// Wraps an error raised by application code, typically inside
    /// [`Bundle::apply`](crate::Bundle::apply).
    pub fn custom(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Custom(error.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Value(e) => match e {
                ValueError::Unsupported { .. } => ErrorKind::UnsupportedOperation,
                ValueError::NotNumeric(_) | ValueError::Deserialize { .. } => {
                    ErrorKind::TypeConversion
                }
                _ => ErrorKind::InvalidArgument,
            },
            Error::Bundle(e) => match e {
                BundleError::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
                BundleError::MissingDependency { .. } | BundleError::DependencyUnavailable(_) => {
                    ErrorKind::MissingDependency
                }
                BundleError::NotRegistered(_) => ErrorKind::NotRegistered,
            },
            Error::Source(e) => match e {
                SourceError::FileNotFound(_) | SourceError::ReadError { .. } => ErrorKind::Io,
                SourceError::JsonParse { .. } | SourceError::TomlParse { .. } => ErrorKind::Parse,
                SourceError::UnsupportedValue { .. } => ErrorKind::UnsupportedOperation,
                SourceError::UnknownFormat(_) | SourceError::RootNotObject(_) => {
                    ErrorKind::InvalidArgument
                }
            },
            Error::Custom(_) => ErrorKind::Other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

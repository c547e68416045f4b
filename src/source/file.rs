//! File-based value source.

use std::path::{Path, PathBuf};

use super::json::JsonSource;
use super::toml::TomlSource;
use super::{SourceError, ValueEntry, ValueSource};

/// A source that loads a JSON or TOML file, chosen by extension.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Toml,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, reading fails when the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    fn format(&self) -> Result<Format, SourceError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(SourceError::UnknownFormat(self.path.clone())),
        }
    }
}

impl ValueSource for FileSource {
    fn entries(&self) -> Result<Vec<ValueEntry>, SourceError> {
        let format = self.format()?;
        let Some(contents) = load_file(&self.path, self.required)? else {
            return Ok(vec![]);
        };

        let origin = self.path.display().to_string();
        match format {
            Format::Json => JsonSource::parse_from(&contents, &origin)?.entries(),
            Format::Toml => TomlSource::parse_from(&contents, &origin)?.entries(),
        }
    }
}

/// Reads a source file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_file(path: &Path, required: bool) -> Result<Option<String>, SourceError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(SourceError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(SourceError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

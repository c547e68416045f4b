use std::path::{Path, PathBuf};

use tracing::debug;

use super::AppContext;
use crate::source::{EnvSource, FileSource, JsonSource, TomlSource, ValueSource};
use crate::Result;

/// A source in the loading pipeline.
#[derive(Debug)]
enum PendingSource {
    File { path: PathBuf, required: bool },
    Json(String),
    Toml(String),
    Env { prefix: String, separator: String },
    Custom(Box<dyn ValueSource>),
}

/// Builder for an [`AppContext`] pre-populated from value sources.
///
/// Sources are read in registration order when [`build`](Self::build) is
/// called. Values are write-once, so two sources producing the same path is
/// an error rather than an override.
///
/// ## Example
///
/// ```no_run
/// use dragon_bundle::AppContext;
///
/// let ctx = AppContext::builder()
///     .with_file("config/default.toml", true)
///     .with_file("config/local.json", false)
///     .with_env("MYAPP", "__")
///     .build()?;
///
/// let port = ctx.get_value("server.port")?.as_number()?;
/// # Ok::<(), dragon_bundle::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    sources: Vec<PendingSource>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a JSON or TOML file, chosen by extension.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(PendingSource::File {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }

    /// Adds an inline JSON document. It is parsed at build time.
    pub fn with_json(mut self, text: impl Into<String>) -> Self {
        self.sources.push(PendingSource::Json(text.into()));
        self
    }

    /// Adds an inline TOML document. It is parsed at build time.
    pub fn with_toml(mut self, text: impl Into<String>) -> Self {
        self.sources.push(PendingSource::Toml(text.into()));
        self
    }

    /// Loads values from environment variables with the given prefix.
    ///
    /// See [`EnvSource`] for how variable names map to paths.
    pub fn with_env(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.sources.push(PendingSource::Env {
            prefix: prefix.into(),
            separator: separator.into(),
        });
        self
    }

    pub fn with_source(mut self, source: impl ValueSource + 'static) -> Self {
        self.sources.push(PendingSource::Custom(Box::new(source)));
        self
    }

    /// Builds the context by reading every source into it.
    pub fn build(self) -> Result<AppContext> {
        let mut ctx = AppContext::new();

        for source in self.sources {
            debug!(source = %source.describe(), "loading value source");
            match source {
                PendingSource::File { path, required } => {
                    FileSource::new(path, required).read_into(&mut ctx)?;
                }
                PendingSource::Json(text) => {
                    JsonSource::parse(&text)?.read_into(&mut ctx)?;
                }
                PendingSource::Toml(text) => {
                    TomlSource::parse(&text)?.read_into(&mut ctx)?;
                }
                PendingSource::Env { prefix, separator } => {
                    EnvSource::new(prefix, separator).read_into(&mut ctx)?;
                }
                PendingSource::Custom(source) => {
                    source.read_into(&mut ctx)?;
                }
            }
        }

        Ok(ctx)
    }
}

impl PendingSource {
    fn describe(&self) -> String {
        match self {
            PendingSource::File { path, .. } => path.display().to_string(),
            PendingSource::Json(_) => "inline json".to_string(),
            PendingSource::Toml(_) => "inline toml".to_string(),
            PendingSource::Env { prefix, .. } => format!("env {prefix}"),
            PendingSource::Custom(source) => format!("{source:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceError, ValueEntry};
    use crate::value::Number;
    use crate::ErrorKind;

    #[derive(Debug)]
    struct Fixed(Vec<ValueEntry>);

    impl ValueSource for Fixed {
        fn entries(&self) -> std::result::Result<Vec<ValueEntry>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_layers_sources_in_order() {
        let ctx = AppContext::builder()
            .with_json(r#"{"app": {"name": "demo"}}"#)
            .with_toml("[server]\nport = 8080\n")
            .with_source(Fixed(vec![ValueEntry::new("server.hosts.0", "a")]))
            .build()
            .unwrap();

        assert_eq!(ctx.get_value("app.name").unwrap().as_string().unwrap(), "demo");
        assert_eq!(ctx.get_value("server.port").unwrap().as_number().unwrap(), Number::Int(8080));
        assert!(ctx.get_value("server.hosts").unwrap().is_array());
    }

    #[test]
    fn test_overlapping_sources_fail() {
        let err = AppContext::builder()
            .with_json(r#"{"a": 1}"#)
            .with_toml("a = 2")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_required_file_missing() {
        let err = AppContext::builder()
            .with_file("/nonexistent/app.json", true)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let ctx = AppContext::builder()
            .with_file("/nonexistent/app.json", false)
            .build()
            .unwrap();
        assert!(ctx.values().is_empty());
    }

    #[test]
    fn test_parse_error_kind() {
        let err = AppContext::builder().with_json("{").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}

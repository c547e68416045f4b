//! Sources that feed documents into the value tree.
//!
//! A source flattens a document into `(path, scalar)` entries; reading it
//! into a context registers each entry in turn. Sources never build tree
//! structure themselves, so every entry goes through the same validation as
//! a direct [`AppContext::register_value`] call.

mod env;
mod error;
mod file;
mod json;
mod toml;

use tracing::debug;

use crate::value::{join_path, Scalar};
use crate::{AppContext, Result};

pub use env::EnvSource;
pub use error::SourceError;
pub use file::FileSource;
pub use json::JsonSource;
pub use self::toml::TomlSource;

/// A single leaf produced by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEntry {
    pub path: String,
    pub value: Scalar,
}

impl ValueEntry {
    pub fn new(path: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

pub trait ValueSource: std::fmt::Debug {
    /// Flattens the source into leaf entries.
    fn entries(&self) -> Result<Vec<ValueEntry>, SourceError>;

    /// Registers every entry of this source into `ctx`.
    ///
    /// Entries are registered one by one; a failure leaves the entries before
    /// it registered.
    fn read_into(&self, ctx: &mut AppContext) -> Result<()> {
        let entries = self.entries()?;
        debug!(count = entries.len(), "reading source into context");
        for entry in entries {
            ctx.register_value(&entry.path, entry.value)?;
        }
        Ok(())
    }
}

/// Path of a child under `prefix`; the root has an empty prefix.
fn child_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        join_path(&[prefix, segment])
    }
}

//! Application bootstrap registry.
//!
//! An [`AppContext`] holds two things that are assembled together at startup:
//!
//! - **Bundles**: typed units of setup logic, identified by type and
//!   [`Qualifier`]. A bundle declares the bundles it depends on, is applied
//!   once when registered, and may register further bundles while applying.
//! - **Values**: a JSON-shaped tree of string and number leaves addressed by
//!   dotted paths such as `server.ports.0`, filled by bundles directly or
//!   from JSON, TOML and environment [sources](source).

pub mod bundle;
pub mod context;
mod error;
pub mod source;
pub mod value;

pub use bundle::{Bundle, BundleError, BundleKey, BundleRef, Dependencies, Qualifier};
pub use context::{AppContext, AppContextBuilder};
pub use error::{Error, ErrorKind, Result};
pub use source::{SourceError, ValueSource};
pub use value::{join_path, Number, Scalar, ValueError, ValueId, ValueNode, ValueTree, PATH_SEPARATOR};

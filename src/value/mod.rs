//! The configuration value tree.

mod error;
mod node;
mod path;
mod tree;

pub use error::ValueError;
pub use node::{Number, Scalar, ValueId, ValueNode};
pub use path::{join_path, PATH_SEPARATOR};
pub use tree::ValueTree;

//! Nodes of the value tree and the scalar payloads they carry.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueError;

/// Index of a node in a [`ValueTree`](super::ValueTree) arena.
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub(crate) usize);

/// A numeric leaf payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as an `i64` if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    /// Returns the value widened to `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// The payload of a leaf: a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Number(Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => n.fmt(f),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<Number> for Scalar {
    fn from(value: Number) -> Self {
        Scalar::Number(value)
    }
}

macro_rules! int_scalar {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                Scalar::Number(Number::Int(i64::from(value)))
            }
        })*
    };
}

int_scalar!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Number(Number::Float(f64::from(value)))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(Number::Float(value))
    }
}

/// Shape of a node.
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Leaf(Scalar),
    Object(HashMap<String, ValueId>),
    Array(Vec<Option<ValueId>>),
}

impl NodeKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            NodeKind::Leaf(_) => "a leaf",
            NodeKind::Object(_) => "an object",
            NodeKind::Array(_) => "an array",
        }
    }
}

/// A node of the value tree: a leaf, an object container or an array container.
///
/// Nodes are owned by the tree; a node only records the id of its parent.
/// Containers cannot be read as scalars, and leaves have no children.
#[derive(Debug, Clone)]
pub struct ValueNode {
    pub(crate) parent: Option<ValueId>,
    pub(crate) kind: NodeKind,
}

impl ValueNode {
    pub(crate) fn new(parent: Option<ValueId>, kind: NodeKind) -> Self {
        Self { parent, kind }
    }

    /// Id of the enclosing container, `None` for the root.
    pub fn parent(&self) -> Option<ValueId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, NodeKind::Array(_))
    }

    pub fn is_container(&self) -> bool {
        !self.is_leaf()
    }

    /// Looks up a child of an object container by key.
    pub fn child(&self, key: &str) -> Result<Option<ValueId>, ValueError> {
        match &self.kind {
            NodeKind::Object(children) => Ok(children.get(key).copied()),
            kind => Err(ValueError::Unsupported {
                operation: "get a child by key",
                found: kind.describe(),
            }),
        }
    }

    /// Looks up an element of an array container. Holes and indices past
    /// the end yield `None`.
    pub fn element(&self, index: usize) -> Result<Option<ValueId>, ValueError> {
        match &self.kind {
            NodeKind::Array(slots) => Ok(slots.get(index).copied().flatten()),
            kind => Err(ValueError::Unsupported {
                operation: "get an element by index",
                found: kind.describe(),
            }),
        }
    }

    /// Number of children (array length including holes), or `None` for a leaf.
    pub fn len(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Object(children) => Some(children.len()),
            NodeKind::Array(slots) => Some(slots.len()),
        }
    }

    /// The payload of a leaf.
    pub fn scalar(&self) -> Result<&Scalar, ValueError> {
        match &self.kind {
            NodeKind::Leaf(value) => Ok(value),
            kind => Err(ValueError::Unsupported {
                operation: "read a scalar",
                found: kind.describe(),
            }),
        }
    }

    /// Replaces the payload of a leaf, returning the previous payload.
    pub fn update(&mut self, value: impl Into<Scalar>) -> Result<Scalar, ValueError> {
        match &mut self.kind {
            NodeKind::Leaf(current) => Ok(std::mem::replace(current, value.into())),
            kind => Err(ValueError::Unsupported {
                operation: "update",
                found: kind.describe(),
            }),
        }
    }

    pub fn as_string(&self) -> Result<String, ValueError> {
        self.scalar().map(ToString::to_string)
    }

    /// Reads a leaf as a number.
    ///
    /// String payloads are parsed as an integer first, then as a float.
    /// Surrounding whitespace is ignored.
    pub fn as_number(&self) -> Result<Number, ValueError> {
        match self.scalar()? {
            Scalar::Number(n) => Ok(*n),
            Scalar::String(s) => {
                let text = s.trim();
                if let Ok(i) = text.parse::<i64>() {
                    return Ok(Number::Int(i));
                }
                if let Ok(f) = text.parse::<f64>() {
                    return Ok(Number::Float(f));
                }
                Err(ValueError::NotNumeric(s.clone()))
            }
        }
    }
}

use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::node::{NodeKind, Number, Scalar, ValueId, ValueNode};
use super::path::{is_index, parse_index, ValuePath};
use super::ValueError;

const ROOT: ValueId = ValueId(0);

/// How far past the end of an array a new index may land.
const MAX_INDEX_GAP: usize = 1024;

/// Where a child hangs off its parent.
#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    Key(&'a str),
    Index(usize),
}

/// Path-addressed tree of string and number leaves.
///
/// Nodes live in an arena and refer to their parent by [`ValueId`]. Only
/// leaves are registered; the object and array containers between the root
/// and a leaf are created on demand from the shape of the path:
///
/// - `a` is a leaf directly under the root
/// - `a.b` makes `a` an object holding the leaf `b`
/// - `a.0` makes `a` an array whose first element is a leaf
/// - `a.0.b` makes `a` an array of objects
///
/// Every path can be registered once. A node keeps its shape for its whole
/// life, so a path that would turn a leaf into a container (or an array into
/// an object) is rejected.
#[derive(Debug, Clone)]
pub struct ValueTree {
    nodes: Vec<ValueNode>,
    registered: HashSet<String>,
    leaves: HashMap<String, ValueId>,
}

impl Default for ValueTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTree {
    /// Creates a tree holding only an empty root object.
    pub fn new() -> Self {
        Self {
            nodes: vec![ValueNode::new(None, NodeKind::Object(HashMap::new()))],
            registered: HashSet::new(),
            leaves: HashMap::new(),
        }
    }

    /// Id of the root object.
    pub fn root(&self) -> ValueId {
        ROOT
    }

    /// Number of registered leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns `true` if a leaf was registered at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.registered.contains(&path.to_lowercase())
    }

    /// Registers a leaf value at `path`, creating the containers leading to it.
    ///
    /// Validation happens before any node is created, so a failed call leaves
    /// the tree untouched.
    pub fn register_value(
        &mut self,
        path: &str,
        value: impl Into<Scalar>,
    ) -> Result<ValueId, ValueError> {
        let parsed = ValuePath::parse(path)?;
        let key = parsed.as_str();
        if self.registered.contains(key) {
            return Err(ValueError::DuplicatePath(key.to_string()));
        }

        let segments = parsed.segments();
        let Some((last, init)) = segments.split_last() else {
            return Err(ValueError::BlankPath);
        };
        if is_index(segments[0]) {
            return Err(ValueError::IndexAtRoot(key.to_string()));
        }

        // Follow the containers that already exist.
        let mut parent = ROOT;
        let mut rest = init;
        while let Some((segment, tail)) = rest.split_first() {
            match self.lookup(parent, key, segment)? {
                (_, Some(child)) => {
                    parent = child;
                    rest = tail;
                }
                (_, None) => break,
            }
        }

        // Containers below the first missing one start out empty.
        if let Some((_, fresh)) = rest.split_first() {
            for segment in fresh.iter().chain(Some(last)) {
                if is_index(segment) {
                    checked_index(key, segment, 0)?;
                }
            }
        }

        for (i, segment) in rest.iter().enumerate() {
            let (slot, _) = self.lookup(parent, key, segment)?;
            // The segment after this one decides the container shape.
            let next = rest.get(i + 1).unwrap_or(last);
            let kind = if is_index(next) {
                NodeKind::Array(Vec::new())
            } else {
                NodeKind::Object(HashMap::new())
            };
            trace!(path = key, segment = *segment, shape = kind.describe(), "creating container");
            parent = self.attach(parent, slot, kind);
        }

        let (slot, existing) = self.lookup(parent, key, last)?;
        if let Some(occupant) = existing {
            return Err(ValueError::SlotOccupied {
                path: key.to_string(),
                segment: last.to_string(),
                found: self.nodes[occupant.0].kind.describe(),
            });
        }

        let id = self.attach(parent, slot, NodeKind::Leaf(value.into()));
        self.registered.insert(key.to_string());
        self.leaves.insert(key.to_string(), id);
        debug!(path = key, "registered value");
        Ok(id)
    }

    /// Returns the node registered at `path`.
    ///
    /// Containers created on the way to a registered leaf can be fetched by
    /// their path as well.
    pub fn get_value(&self, path: &str) -> Result<&ValueNode, ValueError> {
        let id = self.value_id(path)?;
        Ok(&self.nodes[id.0])
    }

    /// Resolves `path` to a node id. See [`get_value`](Self::get_value).
    pub fn value_id(&self, path: &str) -> Result<ValueId, ValueError> {
        let parsed = ValuePath::parse(path)?;
        if let Some(id) = self.leaves.get(parsed.as_str()) {
            return Ok(*id);
        }
        self.resolve(&parsed.segments())
            .ok_or_else(|| ValueError::NotFound(parsed.as_str().to_string()))
    }

    pub fn node(&self, id: ValueId) -> Option<&ValueNode> {
        self.nodes.get(id.0)
    }

    /// Replaces the payload of the leaf `id`, returning the previous payload.
    pub fn update(&mut self, id: ValueId, value: impl Into<Scalar>) -> Result<Scalar, ValueError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| ValueError::NotFound(format!("#{}", id.0)))?
            .update(value)
    }

    /// Replaces the payload of the leaf at `path`, returning the previous payload.
    pub fn update_value(&mut self, path: &str, value: impl Into<Scalar>) -> Result<Scalar, ValueError> {
        let id = self.value_id(path)?;
        self.nodes[id.0].update(value)
    }

    /// Renders the subtree at `id` as JSON. Array holes become `null`.
    pub fn to_json(&self, id: ValueId) -> Option<serde_json::Value> {
        self.nodes.get(id.0).map(|_| self.render(id))
    }

    /// Deserializes the subtree at `path` into `T`.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> Result<T, ValueError> {
        let id = self.value_id(path)?;
        serde_json::from_value(self.render(id)).map_err(|source| ValueError::Deserialize {
            path: path.to_lowercase(),
            source,
        })
    }

    /// Finds the child of `parent` addressed by `segment`, checking that the
    /// parent has the shape the segment asks for.
    fn lookup<'s>(
        &self,
        parent: ValueId,
        path: &str,
        segment: &'s str,
    ) -> Result<(Slot<'s>, Option<ValueId>), ValueError> {
        let node = &self.nodes[parent.0];
        match (&node.kind, is_index(segment)) {
            (NodeKind::Array(slots), true) => {
                let index = checked_index(path, segment, slots.len())?;
                Ok((Slot::Index(index), slots.get(index).copied().flatten()))
            }
            (NodeKind::Object(children), false) => {
                Ok((Slot::Key(segment), children.get(segment).copied()))
            }
            (kind, index) => Err(ValueError::ShapeMismatch {
                path: path.to_string(),
                segment: segment.to_string(),
                expected: if index { "an array" } else { "an object" },
                found: kind.describe(),
            }),
        }
    }

    fn attach(&mut self, parent: ValueId, slot: Slot<'_>, kind: NodeKind) -> ValueId {
        let id = ValueId(self.nodes.len());

        match (&mut self.nodes[parent.0].kind, slot) {
            (NodeKind::Array(slots), Slot::Index(index)) => {
                if index < slots.len() {
                    slots[index] = Some(id);
                } else {
                    slots.resize(index, None);
                    slots.push(Some(id));
                }
            }
            (NodeKind::Object(children), Slot::Key(key)) => {
                children.insert(key.to_string(), id);
            }
            _ => unreachable!("slot shape is checked by lookup"),
        }

        self.nodes.push(ValueNode::new(Some(parent), kind));
        id
    }

    fn resolve(&self, segments: &[&str]) -> Option<ValueId> {
        segments.iter().try_fold(ROOT, |id, segment| {
            let node = &self.nodes[id.0];
            if is_index(segment) {
                node.element(parse_index(segment)?).ok().flatten()
            } else {
                node.child(segment).ok().flatten()
            }
        })
    }

    fn render(&self, id: ValueId) -> serde_json::Value {
        use serde_json::Value;

        match &self.nodes[id.0].kind {
            NodeKind::Leaf(Scalar::String(s)) => Value::String(s.clone()),
            NodeKind::Leaf(Scalar::Number(Number::Int(i))) => Value::from(*i),
            NodeKind::Leaf(Scalar::Number(Number::Float(f))) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            NodeKind::Object(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), self.render(*child)))
                    .collect(),
            ),
            NodeKind::Array(slots) => Value::Array(
                slots
                    .iter()
                    .map(|slot| slot.map_or(Value::Null, |child| self.render(child)))
                    .collect(),
            ),
        }
    }
}

/// Parses an index segment into an array of `len` slots, refusing indices
/// that do not fit or would open a gap wider than [`MAX_INDEX_GAP`].
fn checked_index(path: &str, segment: &str, len: usize) -> Result<usize, ValueError> {
    let limit = len.saturating_add(MAX_INDEX_GAP);
    parse_index(segment)
        .filter(|index| *index <= limit)
        .ok_or_else(|| ValueError::IndexOutOfRange {
            path: path.to_string(),
            segment: segment.to_string(),
            limit,
        })
}

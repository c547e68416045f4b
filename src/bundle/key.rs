use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Bundle;

/// Discriminator letting several bundles of one type coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// The bundle is registered without a qualifier.
    #[default]
    None,
    Named(Cow<'static, str>),
}

impl Qualifier {
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Qualifier::Named(name.into())
    }
}

impl From<&'static str> for Qualifier {
    fn from(name: &'static str) -> Self {
        Qualifier::Named(Cow::Borrowed(name))
    }
}

impl From<String> for Qualifier {
    fn from(name: String) -> Self {
        Qualifier::Named(Cow::Owned(name))
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::None => f.write_str("<none>"),
            Qualifier::Named(name) => f.write_str(name),
        }
    }
}

/// Identity of a registered bundle: its concrete type plus a [`Qualifier`].
///
/// Equality and hashing ignore the type name, which is kept for messages.
#[derive(Debug, Clone)]
pub struct BundleKey {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Qualifier,
}

impl BundleKey {
    /// Key of the unqualified bundle of type `B`.
    pub fn of<B: Bundle>() -> Self {
        Self::qualified::<B>(Qualifier::None)
    }

    pub fn qualified<B: Bundle>(qualifier: impl Into<Qualifier>) -> Self {
        Self {
            type_id: TypeId::of::<B>(),
            type_name: type_name::<B>(),
            qualifier: qualifier.into(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// Returns `true` if the key names a bundle of type `B`.
    pub fn is<B: Bundle>(&self) -> bool {
        self.type_id == TypeId::of::<B>()
    }
}

impl PartialEq for BundleKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for BundleKey {}

impl Hash for BundleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Qualifier::None => f.write_str(self.type_name),
            Qualifier::Named(name) => write!(f, "{}[{}]", self.type_name, name),
        }
    }
}

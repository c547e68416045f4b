//! Bundles of application setup logic and the registry that orders them.

mod error;
mod key;
mod registry;

use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;
use std::slice;

use crate::{AppContext, Result};

pub use error::BundleError;
pub use key::{BundleKey, Qualifier};
pub use registry::BundleRegistry;

/// A unit of application setup.
///
/// A bundle is applied once, when it is registered into an [`AppContext`].
/// During [`apply`](Self::apply) it may register values and further bundles;
/// those bundles are recorded as provided by this one.
///
/// Registered bundles are shared behind `Rc`, so state a bundle records
/// while applying needs interior mutability.
///
/// ## Example
///
/// ```
/// use dragon_bundle::{AppContext, Bundle, Dependencies, Qualifier};
///
/// #[derive(Debug)]
/// struct Server;
///
/// impl Bundle for Server {
///     fn apply(&self, ctx: &mut AppContext, _deps: &Dependencies) -> dragon_bundle::Result<()> {
///         ctx.register_value("server.port", 8080)?;
///         Ok(())
///     }
/// }
///
/// let mut ctx = AppContext::new();
/// ctx.register_bundle(Server, Qualifier::None)?;
/// assert_eq!(ctx.get_value("server.port")?.as_string()?, "8080");
/// # Ok::<(), dragon_bundle::Error>(())
/// ```
pub trait Bundle: Any + fmt::Debug {
    /// Sets up this bundle. `deps` holds the bundles named by
    /// [`requires`](Self::requires), in the same order.
    fn apply(&self, ctx: &mut AppContext, deps: &Dependencies) -> Result<()>;

    /// Bundles that must be registered before this one.
    fn requires(&self) -> Vec<BundleKey> {
        Vec::new()
    }
}

/// A registered bundle together with its identity.
#[derive(Clone)]
pub struct BundleRef {
    key: BundleKey,
    bundle: Rc<dyn Bundle>,
    any: Rc<dyn Any>,
}

impl BundleRef {
    pub(crate) fn new<B: Bundle>(bundle: B, qualifier: Qualifier) -> Self {
        let bundle = Rc::new(bundle);
        Self {
            key: BundleKey::qualified::<B>(qualifier),
            bundle: bundle.clone(),
            any: bundle,
        }
    }

    pub fn key(&self) -> &BundleKey {
        &self.key
    }

    pub fn bundle(&self) -> &dyn Bundle {
        self.bundle.as_ref()
    }

    pub fn is<B: Bundle>(&self) -> bool {
        self.any.is::<B>()
    }

    /// Returns the bundle as its concrete type, if it is a `B`.
    pub fn downcast<B: Bundle>(&self) -> Option<Rc<B>> {
        self.any.clone().downcast::<B>().ok()
    }

    /// Returns `true` if both refer to the same bundle instance.
    pub fn same_instance(&self, other: &BundleRef) -> bool {
        Rc::ptr_eq(&self.any, &other.any)
    }
}

impl fmt::Debug for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleRef")
            .field("key", &self.key)
            .field("bundle", &self.bundle)
            .finish()
    }
}

/// The resolved dependencies handed to [`Bundle::apply`].
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    bundles: Vec<BundleRef>,
}

impl Dependencies {
    pub(crate) fn new(bundles: Vec<BundleRef>) -> Self {
        Self { bundles }
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, BundleRef> {
        self.bundles.iter()
    }

    /// The dependency declared at `index`, if it is a `B`.
    pub fn get<B: Bundle>(&self, index: usize) -> Option<Rc<B>> {
        self.bundles.get(index).and_then(BundleRef::downcast::<B>)
    }

    /// The first dependency of type `B`.
    pub fn first<B: Bundle>(&self) -> Option<Rc<B>> {
        self.bundles.iter().find_map(BundleRef::downcast::<B>)
    }

    /// Like [`first`](Self::first), but fails when no `B` was declared.
    pub fn require<B: Bundle>(&self) -> Result<Rc<B>> {
        self.first::<B>()
            .ok_or_else(|| BundleError::DependencyUnavailable(type_name::<B>()).into())
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a BundleRef;
    type IntoIter = slice::Iter<'a, BundleRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.bundles.iter()
    }
}

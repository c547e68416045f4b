//! Application context shared by every bundle.

mod builder;

use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::bundle::{Bundle, BundleKey, BundleRef, BundleRegistry, Qualifier};
use crate::value::{Scalar, ValueId, ValueNode, ValueTree};
use crate::Result;

pub use builder::AppContextBuilder;

/// Central application context: the bundle registry plus the value tree.
///
/// Bundles are registered into the context and applied immediately, in
/// registration order. A bundle's [`apply`](Bundle::apply) receives the
/// context and may register values and further bundles.
///
/// The context is meant to be assembled once at startup on a single thread;
/// it is neither `Send` nor `Sync`.
///
/// ## Example
///
/// ```
/// use dragon_bundle::{AppContext, Bundle, BundleKey, Dependencies, Qualifier};
///
/// #[derive(Debug)]
/// struct Database;
///
/// impl Bundle for Database {
///     fn apply(&self, ctx: &mut AppContext, _deps: &Dependencies) -> dragon_bundle::Result<()> {
///         ctx.register_value("database.url", "postgres://localhost/app")?;
///         Ok(())
///     }
/// }
///
/// #[derive(Debug)]
/// struct Repositories;
///
/// impl Bundle for Repositories {
///     fn apply(&self, ctx: &mut AppContext, deps: &Dependencies) -> dragon_bundle::Result<()> {
///         deps.require::<Database>()?;
///         let url = ctx.get_value("database.url")?.as_string()?;
///         ctx.register_value("repositories.url", url)?;
///         Ok(())
///     }
///
///     fn requires(&self) -> Vec<BundleKey> {
///         vec![BundleKey::of::<Database>()]
///     }
/// }
///
/// let mut ctx = AppContext::new();
/// ctx.register_bundle(Database, Qualifier::None)?;
/// ctx.register_bundle(Repositories, Qualifier::None)?;
/// assert!(ctx.is_bundle_registered::<Repositories>(Qualifier::None));
/// # Ok::<(), dragon_bundle::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct AppContext {
    bundles: BundleRegistry,
    values: ValueTree,
}

impl AppContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder that loads value sources into a fresh context.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn bundles(&self) -> &BundleRegistry {
        &self.bundles
    }

    pub fn values(&self) -> &ValueTree {
        &self.values
    }

    /// Registers `bundle` under `qualifier` and applies it.
    ///
    /// Every bundle named by [`Bundle::requires`] must already be registered.
    /// The bundle becomes visible before `apply` runs. Registration is not
    /// transactional: if `apply` fails, the bundle and whatever it registered
    /// before failing stay registered.
    pub fn register_bundle<B: Bundle>(
        &mut self,
        bundle: B,
        qualifier: impl Into<Qualifier>,
    ) -> Result<()> {
        let requires = bundle.requires();
        let entry = BundleRef::new(bundle, qualifier.into());
        let deps = self.bundles.enter(entry.clone(), &requires)?;

        let mut scope = RegistrationScope { ctx: self };
        entry.bundle().apply(&mut scope, &deps)
    }

    pub fn get_bundle<B: Bundle>(&self, qualifier: impl Into<Qualifier>) -> Result<Rc<B>> {
        Ok(self.bundles.get::<B>(qualifier)?)
    }

    pub fn is_bundle_registered<B: Bundle>(&self, qualifier: impl Into<Qualifier>) -> bool {
        self.bundles.is_registered::<B>(qualifier)
    }

    /// Runs `f` with the bundle of type `B` registered under `qualifier`.
    pub fn use_bundle<B, R, F>(&self, qualifier: impl Into<Qualifier>, f: F) -> Result<R>
    where
        B: Bundle,
        F: FnOnce(&B) -> Result<R>,
    {
        let bundle = self.get_bundle::<B>(qualifier)?;
        f(&bundle)
    }

    /// Bundles registered while the bundle of type `B` was being applied.
    pub fn provided_by<B: Bundle>(&self, qualifier: impl Into<Qualifier>) -> Result<&[BundleRef]> {
        Ok(self.bundles.provided_by::<B>(qualifier)?)
    }

    pub fn provided_by_key(&self, key: &BundleKey) -> Result<&[BundleRef]> {
        Ok(self.bundles.provided_by_key(key)?)
    }

    /// Registers a leaf value. See [`ValueTree::register_value`].
    pub fn register_value(&mut self, path: &str, value: impl Into<Scalar>) -> Result<ValueId> {
        Ok(self.values.register_value(path, value)?)
    }

    pub fn get_value(&self, path: &str) -> Result<&ValueNode> {
        Ok(self.values.get_value(path)?)
    }

    pub fn value_id(&self, path: &str) -> Result<ValueId> {
        Ok(self.values.value_id(path)?)
    }

    pub fn node(&self, id: ValueId) -> Option<&ValueNode> {
        self.values.node(id)
    }

    /// Replaces the payload of the leaf `id`, returning the previous payload.
    pub fn update(&mut self, id: ValueId, value: impl Into<Scalar>) -> Result<Scalar> {
        Ok(self.values.update(id, value)?)
    }

    pub fn update_value(&mut self, path: &str, value: impl Into<Scalar>) -> Result<Scalar> {
        Ok(self.values.update_value(path, value)?)
    }

    /// Deserializes the subtree at `path` into `T`.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.values.extract(path)?)
    }

    /// Joins segments into a dotted path.
    pub fn join_path<S: AsRef<str>>(parts: &[S]) -> String {
        crate::value::join_path(parts)
    }
}

/// Mutable access to the context while a bundle is applied; pops the
/// registration stack when dropped, including when `apply` fails.
struct RegistrationScope<'a> {
    ctx: &'a mut AppContext,
}

impl Deref for RegistrationScope<'_> {
    type Target = AppContext;

    fn deref(&self) -> &AppContext {
        self.ctx
    }
}

impl DerefMut for RegistrationScope<'_> {
    fn deref_mut(&mut self) -> &mut AppContext {
        self.ctx
    }
}

impl Drop for RegistrationScope<'_> {
    fn drop(&mut self) {
        self.ctx.bundles.exit();
    }
}

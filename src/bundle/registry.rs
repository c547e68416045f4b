use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::{Bundle, BundleError, BundleKey, BundleRef, Dependencies, Qualifier};

/// Registered bundles, keyed by [`BundleKey`].
///
/// Besides the bundles themselves the registry tracks provenance: while a
/// bundle is being applied it sits on top of the registration stack, and
/// every bundle registered in the meantime is recorded as provided by it.
#[derive(Debug, Default)]
pub struct BundleRegistry {
    bundles: HashMap<BundleKey, BundleRef>,
    provided: HashMap<BundleKey, Vec<BundleRef>>,
    stack: Vec<BundleKey>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Records `entry` and pushes it onto the registration stack.
    ///
    /// Fails if the identity is taken or a dependency is missing; nothing is
    /// recorded in that case. Every successful call must be paired with
    /// [`exit`](Self::exit) once the bundle has been applied.
    pub(crate) fn enter(
        &mut self,
        entry: BundleRef,
        requires: &[BundleKey],
    ) -> Result<Dependencies, BundleError> {
        let key = entry.key().clone();
        if self.bundles.contains_key(&key) {
            return Err(BundleError::AlreadyRegistered(key));
        }

        let deps = requires
            .iter()
            .map(|dependency| {
                self.bundles
                    .get(dependency)
                    .cloned()
                    .ok_or_else(|| BundleError::MissingDependency {
                        bundle: key.clone(),
                        dependency: dependency.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.stack.last() {
            Some(parent) => {
                debug!(bundle = %key, parent = %parent, "registering provided bundle");
                self.provided
                    .entry(parent.clone())
                    .or_default()
                    .push(entry.clone());
            }
            None => debug!(bundle = %key, "registering bundle"),
        }

        self.bundles.insert(key.clone(), entry);
        self.provided.insert(key.clone(), Vec::new());
        self.stack.push(key);
        Ok(Dependencies::new(deps))
    }

    /// Pops the bundle that finished applying.
    pub(crate) fn exit(&mut self) {
        self.stack.pop();
    }

    /// The bundle currently being applied, if any.
    pub fn registering(&self) -> Option<&BundleKey> {
        self.stack.last()
    }

    pub fn contains(&self, key: &BundleKey) -> bool {
        self.bundles.contains_key(key)
    }

    pub fn is_registered<B: Bundle>(&self, qualifier: impl Into<Qualifier>) -> bool {
        self.contains(&BundleKey::qualified::<B>(qualifier))
    }

    pub fn get_ref(&self, key: &BundleKey) -> Result<&BundleRef, BundleError> {
        self.bundles
            .get(key)
            .ok_or_else(|| BundleError::NotRegistered(key.clone()))
    }

    /// Returns the bundle of type `B` registered under `qualifier`.
    pub fn get<B: Bundle>(&self, qualifier: impl Into<Qualifier>) -> Result<Rc<B>, BundleError> {
        let key = BundleKey::qualified::<B>(qualifier);
        self.get_ref(&key)?
            .downcast::<B>()
            .ok_or(BundleError::NotRegistered(key))
    }

    /// Bundles registered while the bundle `key` was being applied, in
    /// registration order.
    pub fn provided_by_key(&self, key: &BundleKey) -> Result<&[BundleRef], BundleError> {
        self.provided
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| BundleError::NotRegistered(key.clone()))
    }

    pub fn provided_by<B: Bundle>(
        &self,
        qualifier: impl Into<Qualifier>,
    ) -> Result<&[BundleRef], BundleError> {
        self.provided_by_key(&BundleKey::qualified::<B>(qualifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppContext;

    #[derive(Debug)]
    struct Alpha;

    impl Bundle for Alpha {
        fn apply(&self, _ctx: &mut AppContext, _deps: &Dependencies) -> crate::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Beta;

    impl Bundle for Beta {
        fn apply(&self, _ctx: &mut AppContext, _deps: &Dependencies) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_enter_records_before_exit() {
        let mut registry = BundleRegistry::new();
        registry.enter(BundleRef::new(Alpha, Qualifier::None), &[]).unwrap();

        assert!(registry.is_registered::<Alpha>(Qualifier::None));
        assert_eq!(registry.registering(), Some(&BundleKey::of::<Alpha>()));

        registry.exit();
        assert!(registry.registering().is_none());
        assert!(registry.get::<Alpha>(Qualifier::None).is_ok());
    }

    #[test]
    fn test_nested_enter_attributes_to_parent() {
        let mut registry = BundleRegistry::new();
        registry.enter(BundleRef::new(Alpha, Qualifier::None), &[]).unwrap();
        registry.enter(BundleRef::new(Beta, Qualifier::None), &[]).unwrap();
        registry.exit();
        registry.exit();

        let provided = registry.provided_by::<Alpha>(Qualifier::None).unwrap();
        assert_eq!(provided.len(), 1);
        assert!(provided[0].is::<Beta>());
        assert!(registry.provided_by::<Beta>(Qualifier::None).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_identity() {
        let mut registry = BundleRegistry::new();
        registry.enter(BundleRef::new(Alpha, Qualifier::None), &[]).unwrap();
        registry.exit();

        let result = registry.enter(BundleRef::new(Alpha, Qualifier::None), &[]);
        assert!(matches!(result, Err(BundleError::AlreadyRegistered(_))));
        assert!(registry.registering().is_none());

        registry.enter(BundleRef::new(Alpha, Qualifier::named("other")), &[]).unwrap();
        registry.exit();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_dependency_records_nothing() {
        let mut registry = BundleRegistry::new();
        let result = registry.enter(
            BundleRef::new(Beta, Qualifier::None),
            &[BundleKey::of::<Alpha>()],
        );

        match result {
            Err(BundleError::MissingDependency { bundle, dependency }) => {
                assert!(bundle.is::<Beta>());
                assert!(dependency.is::<Alpha>());
            }
            other => panic!("expected missing dependency, got {other:?}"),
        }
        assert!(registry.is_empty());
        assert!(registry.registering().is_none());
    }

    #[test]
    fn test_unknown_identity() {
        let registry = BundleRegistry::new();
        assert!(!registry.is_registered::<Alpha>(Qualifier::None));
        assert!(matches!(
            registry.get::<Alpha>(Qualifier::None),
            Err(BundleError::NotRegistered(_))
        ));
        assert!(matches!(
            registry.provided_by::<Alpha>("x"),
            Err(BundleError::NotRegistered(_))
        ));
    }
}

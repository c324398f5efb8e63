//! Registry of skip predicates referenced by `YamlProperty::skip_at_dump_if`.
//!
//! Predicates are resolved by [`PredicateId`] instead of being constructed
//! from a type reference at emit time. A registration is either a shared
//! instance or a factory run once per property emission.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::{PredicateId, SkipIfEmpty, SkipIfNull, SkipPredicate};

/// Why a predicate could not be produced.
#[derive(Debug, Clone, Error)]
pub enum InstantiationError {
    #[error("no predicate registered as '{0}'")]
    NotRegistered(PredicateId),
    #[error("{0}")]
    Failed(String),
}

type FactoryFn = dyn Fn() -> Result<Box<dyn SkipPredicate>, String> + Send + Sync;

enum Registration {
    Shared(Arc<dyn SkipPredicate>),
    Factory(Box<FactoryFn>),
}

/// Registry for storing and instantiating skip predicates.
pub struct PredicateRegistry {
    predicates: HashMap<PredicateId, Registration>,
}

impl PredicateRegistry {
    /// Registry holding only the built-in `SkipIfEmpty` and `SkipIfNull`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_shared(PredicateId::of::<SkipIfEmpty>(), Arc::new(SkipIfEmpty));
        registry.register_shared(PredicateId::of::<SkipIfNull>(), Arc::new(SkipIfNull));
        registry
    }

    /// Registry without any predicates, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Register a predicate type under `PredicateId::of::<P>()`.
    ///
    /// A fresh `P::default()` is created for every emission.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Default)]
    /// struct SkipZero;
    ///
    /// impl SkipPredicate for SkipZero {
    ///     fn skip(&self, _: &ObjectValue, _: &Property, value: &Value, _: Option<&Tag>) -> bool {
    ///         matches!(value, Value::Int(0))
    ///     }
    /// }
    ///
    /// let mut registry = PredicateRegistry::new();
    /// registry.register::<SkipZero>();
    /// ```
    pub fn register<P>(&mut self) -> PredicateId
    where
        P: SkipPredicate + Default + 'static,
    {
        let id = PredicateId::of::<P>();
        self.register_factory(id.clone(), || Ok(Box::new(P::default()) as Box<dyn SkipPredicate>));
        id
    }

    /// Register a stateless instance shared by all emissions.
    pub fn register_shared(&mut self, id: impl Into<PredicateId>, predicate: Arc<dyn SkipPredicate>) {
        self.predicates.insert(id.into(), Registration::Shared(predicate));
    }

    /// Register a fallible constructor, run once per emission.
    pub fn register_factory<F>(&mut self, id: impl Into<PredicateId>, factory: F)
    where
        F: Fn() -> Result<Box<dyn SkipPredicate>, String> + Send + Sync + 'static,
    {
        self.predicates.insert(id.into(), Registration::Factory(Box::new(factory)));
    }

    /// Produce the predicate registered under `id`.
    ///
    /// # Errors
    ///
    /// * `InstantiationError::NotRegistered` - nothing registered under `id`
    /// * `InstantiationError::Failed` - the factory returned an error
    pub fn instantiate(&self, id: &PredicateId) -> Result<Arc<dyn SkipPredicate>, InstantiationError> {
        match self.predicates.get(id) {
            Some(Registration::Shared(predicate)) => Ok(Arc::clone(predicate)),
            Some(Registration::Factory(factory)) => factory()
                .map(Arc::from)
                .map_err(InstantiationError::Failed),
            None => Err(InstantiationError::NotRegistered(id.clone())),
        }
    }

    pub fn has_predicate(&self, id: &PredicateId) -> bool {
        self.predicates.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn list_predicates(&self) -> Vec<PredicateId> {
        let mut ids: Vec<PredicateId> = self.predicates.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn count(&self) -> usize {
        self.predicates.len()
    }
}

impl Default for PredicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.list_predicates())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Tag;
    use crate::property::{Property, TypeDescriptor};
    use crate::value::{ObjectValue, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Default for Counted {
        fn default() -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Counted
        }
    }

    impl SkipPredicate for Counted {
        fn skip(&self, _: &ObjectValue, _: &Property, _: &Value, _: Option<&Tag>) -> bool {
            true
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = PredicateRegistry::new();

        assert!(registry.has_predicate(&PredicateId::of::<SkipIfEmpty>()));
        assert!(registry.has_predicate(&PredicateId::of::<SkipIfNull>()));
        assert_eq!(registry.count(), 2);
        assert_eq!(PredicateRegistry::empty().count(), 0);
    }

    #[test]
    fn test_register_type_constructs_per_call() {
        let mut registry = PredicateRegistry::empty();
        let id = registry.register::<Counted>();

        let before = CONSTRUCTED.load(Ordering::SeqCst);
        registry.instantiate(&id).unwrap();
        registry.instantiate(&id).unwrap();
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst) - before, 2);
    }

    #[test]
    fn test_shared_instance_is_reused() {
        let mut registry = PredicateRegistry::empty();
        let shared: Arc<dyn SkipPredicate> = Arc::new(SkipIfNull);
        registry.register_shared("null", Arc::clone(&shared));

        let a = registry.instantiate(&PredicateId::new("null")).unwrap();
        let b = registry.instantiate(&PredicateId::new("null")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_predicate() {
        let registry = PredicateRegistry::new();
        let err = registry.instantiate(&PredicateId::new("missing")).err().unwrap();

        assert!(matches!(err, InstantiationError::NotRegistered(_)));
        assert_eq!(err.to_string(), "no predicate registered as 'missing'");
    }

    #[test]
    fn test_failing_factory() {
        let mut registry = PredicateRegistry::empty();
        registry.register_factory("broken", || Err("no zero-argument constructor".to_string()));

        let err = registry.instantiate(&PredicateId::new("broken")).err().unwrap();
        assert_eq!(err.to_string(), "no zero-argument constructor");
    }

    #[test]
    fn test_closure_registration() {
        let descriptor = TypeDescriptor::builder("T").property("p", |p| p).build().unwrap();
        let property = descriptor.properties()[0].clone();
        let object = ObjectValue::new(descriptor);

        let mut registry = PredicateRegistry::empty();
        registry.register_shared(
            "zero",
            Arc::new(|_: &ObjectValue, _: &Property, value: &Value, _: Option<&Tag>| {
                matches!(value, Value::Int(0))
            }),
        );

        let predicate = registry.instantiate(&PredicateId::new("zero")).unwrap();
        assert!(predicate.skip(&object, &property, &Value::Int(0), None));
        assert!(!predicate.skip(&object, &property, &Value::Int(1), None));
        assert_eq!(registry.list_predicates(), vec![PredicateId::new("zero")]);
    }
}

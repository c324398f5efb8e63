//! Skip predicates decide, per property and value, whether a property is
//! left out of the emitted mapping.
//!
//! Two built-ins are provided: [`SkipIfNull`] and [`SkipIfEmpty`]. User
//! predicates are registered in a [`PredicateRegistry`] and referenced from
//! `YamlProperty::skip_at_dump_if` by [`PredicateId`].

pub mod registry;

use std::fmt;

use crate::node::Tag;
use crate::property::Property;
use crate::value::{ObjectValue, Value};

pub use registry::PredicateRegistry;

/// Decision function for skipping a property at dump time.
///
/// Implementations must be cheap and free of side effects: the registry may
/// construct a fresh instance for every property emission.
pub trait SkipPredicate: Send + Sync {
    /// Returns true if the property should not be emitted.
    ///
    /// # Arguments
    ///
    /// * `object` - The object owning the property
    /// * `property` - The property being emitted
    /// * `value` - The property's runtime value
    /// * `tag` - The explicit tag configured for the property, if any
    fn skip(&self, object: &ObjectValue, property: &Property, value: &Value, tag: Option<&Tag>) -> bool;
}

/// Closures work as predicates.
impl<F> SkipPredicate for F
where
    F: Fn(&ObjectValue, &Property, &Value, Option<&Tag>) -> bool + Send + Sync,
{
    fn skip(&self, object: &ObjectValue, property: &Property, value: &Value, tag: Option<&Tag>) -> bool {
        self(object, property, value, tag)
    }
}

/// Identifier a property uses to reference a registered predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(String);

impl PredicateId {
    pub fn new(id: impl Into<String>) -> Self {
        PredicateId(id.into())
    }

    /// Identifier derived from a predicate type's path.
    pub fn of<P: ?Sized + 'static>() -> Self {
        PredicateId(std::any::type_name::<P>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PredicateId {
    fn from(id: &str) -> Self {
        PredicateId::new(id)
    }
}

/// Skips null values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipIfNull;

impl SkipIfNull {
    pub fn instance() -> &'static SkipIfNull {
        static INSTANCE: SkipIfNull = SkipIfNull;
        &INSTANCE
    }
}

impl SkipPredicate for SkipIfNull {
    fn skip(&self, _object: &ObjectValue, _property: &Property, value: &Value, _tag: Option<&Tag>) -> bool {
        value.is_null()
    }
}

/// Skips null values, empty strings and empty sequences, sets and mappings.
///
/// Numbers, booleans and objects are never considered empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipIfEmpty;

impl SkipIfEmpty {
    pub fn instance() -> &'static SkipIfEmpty {
        static INSTANCE: SkipIfEmpty = SkipIfEmpty;
        &INSTANCE
    }
}

impl SkipPredicate for SkipIfEmpty {
    fn skip(&self, _object: &ObjectValue, _property: &Property, value: &Value, _tag: Option<&Tag>) -> bool {
        match value {
            Value::Null => true,
            Value::String(_) | Value::Sequence(_) | Value::Set(_) | Value::Mapping(_) => {
                value.len() == Some(0)
            }
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Object(_) => false,
        }
    }
}

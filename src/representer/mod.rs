//! Annotation-aware representer.
//!
//! Turns a [`Value`] tree into a YAML [`Node`] tree and, from there, into
//! YAML text. For objects the representer
//!
//! 1. orders the type's properties by `YamlProperty.order` (greater first),
//! 2. filters each property through the skip rules,
//! 3. flattens the any-getter property into the object's mapping.
//!
//! Skip rules, first match wins:
//!
//! 1. `skip_empty` and the value is null or empty
//! 2. `skip_empty` and the value is null
//! 3. `YamlProperty.skip_at_dump`
//! 4. the `YamlProperty.skip_at_dump_if` predicate returns true
//!
//! With [`RepresenterConfig::predicates_first`] rules 3 and 4 run first and a
//! property's own predicate overrides rules 1 and 2.

pub mod any_getter;

use std::io::Write;
use std::sync::Arc;

use crate::config::RepresenterConfig;
use crate::error::{Error, Result};
use crate::node::{MappingNode, Node, NodeTuple, SequenceNode, Tag};
use crate::property::{Property, PropertyUtils, TypeDescriptor};
use crate::skip::{PredicateId, PredicateRegistry, SkipIfEmpty, SkipIfNull, SkipPredicate};
use crate::value::{ObjectValue, ToYaml, Value};

pub use any_getter::flatten_any_getter;

/// Why a property was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    Null,
    SkipAtDump,
    Predicate(PredicateId),
}

/// Outcome of the user predicate step.
enum PredicateVerdict {
    None,
    Skip(PredicateId),
    Keep,
}

/// Represents values as YAML, honoring property annotations.
///
/// A representer caches ordered property sets and is not `Sync`; use one
/// instance per thread.
///
/// # Example
///
/// ```ignore
/// use yamlanno::{ObjectValue, Representer, TypeDescriptor};
///
/// let descriptor = TypeDescriptor::builder("Point")
///     .property("x", |p| p.order(2))
///     .property("y", |p| p.order(1))
///     .build()?;
/// let point = ObjectValue::new(descriptor).with("x", 1).with("y", 2);
///
/// let yaml = Representer::default().dump(&point)?;
/// assert_eq!(yaml, "x: 1\ny: 2\n");
/// ```
#[derive(Debug)]
pub struct Representer {
    config: RepresenterConfig,
    registry: PredicateRegistry,
    property_utils: PropertyUtils,
}

impl Default for Representer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Representer {
    /// Create a representer; `skip_empty` drops null and empty values.
    pub fn new(skip_empty: bool) -> Self {
        Self::with_config(RepresenterConfig::new(skip_empty))
    }

    pub fn with_config(config: RepresenterConfig) -> Self {
        Self {
            config,
            registry: PredicateRegistry::new(),
            property_utils: PropertyUtils::new(),
        }
    }

    /// Replace the predicate registry.
    pub fn with_registry(mut self, registry: PredicateRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PredicateRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &RepresenterConfig {
        &self.config
    }

    pub fn skip_empty(&self) -> bool {
        self.config.skip_empty
    }

    /// Ordered property set of a type.
    pub fn get_properties(&self, descriptor: &TypeDescriptor) -> Arc<[Property]> {
        self.property_utils.get_properties(descriptor)
    }

    /// Serialize a value to a YAML document.
    pub fn dump<T: ToYaml + ?Sized>(&self, value: &T) -> Result<String> {
        let node = self.represent(&value.to_yaml())?;
        Ok(serde_yaml::to_string(&node)?)
    }

    /// Serialize a value as YAML into `writer`.
    pub fn dump_to_writer<W, T>(&self, writer: W, value: &T) -> Result<()>
    where
        W: Write,
        T: ToYaml + ?Sized,
    {
        let node = self.represent(&value.to_yaml())?;
        serde_yaml::to_writer(writer, &node)?;
        Ok(())
    }

    /// Build the node tree for a value.
    pub fn represent(&self, value: &Value) -> Result<Node> {
        let node = match value {
            Value::Null => Node::scalar(Tag::NULL, "null"),
            Value::Bool(b) => Node::scalar(Tag::BOOL, b.to_string()),
            Value::Int(i) => Node::scalar(Tag::INT, i.to_string()),
            Value::Float(f) => Node::scalar(Tag::FLOAT, format!("{:?}", f)),
            Value::String(s) => Node::str(s.as_str()),
            Value::Sequence(items) => Node::Sequence(SequenceNode {
                tag: Tag::SEQ,
                value: items.iter().map(|v| self.represent(v)).collect::<Result<_>>()?,
            }),
            Value::Set(items) => {
                let mut mapping = MappingNode::new(Tag::SET);
                for item in items {
                    mapping.push(NodeTuple::new(self.represent(item)?, Node::scalar(Tag::NULL, "null")));
                }
                Node::Mapping(mapping)
            }
            Value::Mapping(map) => {
                let mut mapping = MappingNode::new(Tag::MAP);
                for (key, item) in map {
                    mapping.push(NodeTuple::new(Node::str(key.as_str()), self.represent(item)?));
                }
                Node::Mapping(mapping)
            }
            Value::Object(object) => Node::Mapping(self.represent_object(object)?),
        };
        Ok(node)
    }

    /// Build the mapping node for an object: ordered, filtered properties
    /// followed by any-getter flattening.
    pub fn represent_object(&self, object: &ObjectValue) -> Result<MappingNode> {
        let properties = self.get_properties(object.descriptor());
        let tag = object.descriptor().tag().cloned().unwrap_or(Tag::MAP);

        let mut mapping = MappingNode::new(tag);
        for property in properties.iter() {
            let value = object.get(property.field());
            if let Some(tuple) = self.represent_property(object, property, value, property.tag())? {
                mapping.push(tuple);
            }
        }

        flatten_any_getter(object.type_name(), &properties, mapping)
    }

    /// Represent one property, or `None` if a skip rule applies.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` if the property's predicate cannot be
    /// instantiated.
    pub fn represent_property(
        &self,
        object: &ObjectValue,
        property: &Property,
        value: &Value,
        tag: Option<&Tag>,
    ) -> Result<Option<NodeTuple>> {
        if let Some(reason) = self.skip_reason(object, property, value, tag)? {
            tracing::debug!(
                "skipping {}.{} ({:?})",
                object.type_name(),
                property.name(),
                reason
            );
            return Ok(None);
        }

        let mut node = self.represent(value)?;
        if let Some(tag) = tag {
            node.set_tag(tag.clone());
        }
        tracing::trace!("emitting {}.{}", object.type_name(), property.name());
        Ok(Some(NodeTuple::new(Node::str(property.name()), node)))
    }

    fn skip_reason(
        &self,
        object: &ObjectValue,
        property: &Property,
        value: &Value,
        tag: Option<&Tag>,
    ) -> Result<Option<SkipReason>> {
        if self.config.predicates_first {
            if let Some(reason) = self.annotation_skip(property) {
                return Ok(Some(reason));
            }
            return match self.predicate_verdict(object, property, value, tag)? {
                PredicateVerdict::Skip(id) => Ok(Some(SkipReason::Predicate(id))),
                PredicateVerdict::Keep => Ok(None),
                PredicateVerdict::None => Ok(self.builtin_skip(object, property, value, tag)),
            };
        }

        if let Some(reason) = self.builtin_skip(object, property, value, tag) {
            return Ok(Some(reason));
        }
        if let Some(reason) = self.annotation_skip(property) {
            return Ok(Some(reason));
        }
        match self.predicate_verdict(object, property, value, tag)? {
            PredicateVerdict::Skip(id) => Ok(Some(SkipReason::Predicate(id))),
            PredicateVerdict::Keep | PredicateVerdict::None => Ok(None),
        }
    }

    fn builtin_skip(
        &self,
        object: &ObjectValue,
        property: &Property,
        value: &Value,
        tag: Option<&Tag>,
    ) -> Option<SkipReason> {
        if !self.config.skip_empty {
            return None;
        }
        if SkipIfEmpty::instance().skip(object, property, value, tag) {
            return Some(SkipReason::Empty);
        }
        if SkipIfNull::instance().skip(object, property, value, tag) {
            return Some(SkipReason::Null);
        }
        None
    }

    fn annotation_skip(&self, property: &Property) -> Option<SkipReason> {
        property
            .yaml_property()
            .filter(|p| p.skip_at_dump)
            .map(|_| SkipReason::SkipAtDump)
    }

    fn predicate_verdict(
        &self,
        object: &ObjectValue,
        property: &Property,
        value: &Value,
        tag: Option<&Tag>,
    ) -> Result<PredicateVerdict> {
        let Some(id) = property.yaml_property().and_then(|p| p.skip_at_dump_if.as_ref()) else {
            return Ok(PredicateVerdict::None);
        };

        let predicate = self.registry.instantiate(id).map_err(|e| Error::Configuration {
            predicate: id.to_string(),
            type_name: object.type_name().to_string(),
            property: property.name().to_string(),
            source: Box::new(e),
        })?;

        if predicate.skip(object, property, value, tag) {
            Ok(PredicateVerdict::Skip(id.clone()))
        } else {
            Ok(PredicateVerdict::Keep)
        }
    }
}

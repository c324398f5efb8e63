//! # yamlanno: Annotation-Driven YAML Representer
//!
//! yamlanno emits structured objects as YAML mappings and lets per-property
//! metadata shape the output:
//!
//! - **Ordering**: `order` is a priority; greater values are emitted first,
//!   ties are broken by property name.
//! - **Skipping**: `skip_at_dump` drops a property outright, `skip_at_dump_if`
//!   consults a registered predicate, and the representer's `skip_empty`
//!   flag drops null and empty values.
//! - **Any-getter flattening**: the entries of a designated mapping property
//!   are merged into the enclosing mapping.
//!
//! ## Example
//!
//! ```ignore
//! use yamlanno::{ObjectValue, Representer, TypeDescriptor};
//! use std::collections::BTreeMap;
//!
//! let descriptor = TypeDescriptor::builder("Service")
//!     .property("name", |p| p.order(10))
//!     .property("replicas", |p| p)
//!     .property("labels", |p| p.any_getter())
//!     .build()?;
//!
//! let mut labels = BTreeMap::new();
//! labels.insert("team", "core");
//!
//! let service = ObjectValue::new(descriptor)
//!     .with("name", "api")
//!     .with("replicas", 3)
//!     .with("labels", labels);
//!
//! let yaml = Representer::default().dump(&service)?;
//! assert_eq!(yaml, "name: api\nreplicas: 3\nteam: core\n");
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod property;
pub mod representer;
pub mod skip;
pub mod value;

// Re-export key types
pub use config::RepresenterConfig;
pub use error::{Error, Result};
pub use node::{MappingNode, Node, NodeTuple, ScalarNode, SequenceNode, Tag};
pub use property::{
    compare_properties, ordered_properties, Property, PropertyBuilder, PropertyUtils,
    TypeDescriptor, TypeDescriptorBuilder, YamlAnyGetter, YamlProperty,
};
pub use representer::{flatten_any_getter, Representer, SkipReason};
pub use skip::registry::InstantiationError;
pub use skip::{PredicateId, PredicateRegistry, SkipIfEmpty, SkipIfNull, SkipPredicate};
pub use value::{ObjectValue, ToYaml, Value};

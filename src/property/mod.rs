//! Property metadata: what the representer knows about each field of a type.
//!
//! A [`TypeDescriptor`] lists a type's properties in declaration order, each
//! optionally annotated with [`YamlProperty`] (ordering, skipping, renaming)
//! or the [`YamlAnyGetter`] marker.
//!
//! ```ignore
//! use yamlanno::{PredicateId, TypeDescriptor};
//!
//! let descriptor = TypeDescriptor::builder("Person")
//!     .property("id", |p| p.order(100))
//!     .property("name", |p| p.key("full_name"))
//!     .property("nickname", |p| p.skip_at_dump_if(PredicateId::new("blank")))
//!     .property("extra", |p| p.any_getter())
//!     .build()?;
//! ```

pub mod order;
pub mod utils;

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::Tag;
use crate::skip::{PredicateId, SkipPredicate};

pub use order::{compare_properties, ordered_properties};
pub use utils::PropertyUtils;

/// Ordering and skipping metadata for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YamlProperty {
    /// Key override. The property is emitted under this name.
    pub key: Option<String>,
    /// Emission priority; greater values come first.
    pub order: i32,
    /// Never emit this property.
    pub skip_at_dump: bool,
    /// Predicate deciding per value whether to skip; `None` means no predicate.
    pub skip_at_dump_if: Option<PredicateId>,
}

/// Marker: the property's mapping value is merged into the enclosing mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlAnyGetter;

/// One property of a type as seen by the representer.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    field: String,
    tag: Option<Tag>,
    yaml_property: Option<YamlProperty>,
    any_getter: Option<YamlAnyGetter>,
}

impl Property {
    /// An unannotated property whose key equals its field name.
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            name: field.clone(),
            field,
            tag: None,
            yaml_property: None,
            any_getter: None,
        }
    }

    /// Key the property is emitted under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field the runtime value is read from.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Explicit tag for this property's value, if any.
    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    pub fn yaml_property(&self) -> Option<&YamlProperty> {
        self.yaml_property.as_ref()
    }

    pub fn any_getter(&self) -> Option<&YamlAnyGetter> {
        self.any_getter.as_ref()
    }

    pub fn is_any_getter(&self) -> bool {
        self.any_getter.is_some()
    }

    /// `YamlProperty.order`, or 0 when unannotated.
    pub fn order(&self) -> i32 {
        self.yaml_property.as_ref().map_or(0, |p| p.order)
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Property {}

impl PartialOrd for Property {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Natural order: lexicographic by emitted name.
impl Ord for Property {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.field.cmp(&other.field))
    }
}

/// Builder for a single property, used through [`TypeDescriptorBuilder::property`].
#[derive(Debug)]
pub struct PropertyBuilder {
    property: Property,
}

impl PropertyBuilder {
    fn new(field: String) -> Self {
        Self {
            property: Property::new(field),
        }
    }

    fn annotation(&mut self) -> &mut YamlProperty {
        self.property.yaml_property.get_or_insert_with(YamlProperty::default)
    }

    /// Replace the whole `YamlProperty` annotation.
    pub fn yaml_property(mut self, annotation: YamlProperty) -> Self {
        self.property.yaml_property = Some(annotation);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.annotation().key = Some(key.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.annotation().order = order;
        self
    }

    pub fn skip_at_dump(mut self) -> Self {
        self.annotation().skip_at_dump = true;
        self
    }

    pub fn skip_at_dump_if(mut self, predicate: PredicateId) -> Self {
        self.annotation().skip_at_dump_if = Some(predicate);
        self
    }

    /// Shorthand for `skip_at_dump_if(PredicateId::of::<P>())`.
    pub fn skip_at_dump_if_type<P: SkipPredicate + 'static>(self) -> Self {
        self.skip_at_dump_if(PredicateId::of::<P>())
    }

    pub fn any_getter(mut self) -> Self {
        self.property.any_getter = Some(YamlAnyGetter);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.property.tag = Some(tag);
        self
    }

    fn finish(mut self) -> Property {
        if let Some(key) = self.property.yaml_property.as_ref().and_then(|p| p.key.clone()) {
            self.property.name = key;
        }
        self.property
    }
}

fn is_blank_tag(tag: &Tag) -> bool {
    matches!(tag.as_str(), "" | "!")
}

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// Reflected type: name, optional tag and properties in declaration order.
#[derive(Debug)]
pub struct TypeDescriptor {
    id: u64,
    name: String,
    tag: Option<Tag>,
    properties: Vec<Property>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            name: name.into(),
            tag: None,
            properties: Vec::new(),
        }
    }

    /// Identity of this descriptor; unique per built descriptor.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.properties.iter().any(|p| p.field == field)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn any_getter(&self) -> Option<&Property> {
        self.properties.iter().find(|p| p.is_any_getter())
    }
}

/// Builder for [`TypeDescriptor`].
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    tag: Option<Tag>,
    properties: Vec<Property>,
}

impl TypeDescriptorBuilder {
    /// Tag emitted on this type's mapping node instead of `!!map`.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Declare a property and configure its annotations.
    pub fn property<F>(mut self, field: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(PropertyBuilder) -> PropertyBuilder,
    {
        let builder = configure(PropertyBuilder::new(field.into()));
        self.properties.push(builder.finish());
        self
    }

    /// Validate and freeze the descriptor.
    ///
    /// # Errors
    ///
    /// `Error::Schema` if two properties share an emitted name, more than
    /// one property is marked as any-getter, or a tag is empty.
    pub fn build(self) -> Result<Arc<TypeDescriptor>> {
        for (i, property) in self.properties.iter().enumerate() {
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(Error::schema(
                    &self.name,
                    &property.name,
                    "duplicate property name",
                ));
            }
        }

        if self.tag.as_ref().is_some_and(is_blank_tag) {
            return Err(Error::schema(&self.name, "", "empty type tag"));
        }
        if let Some(property) = self.properties.iter().find(|p| p.tag.as_ref().is_some_and(is_blank_tag)) {
            return Err(Error::schema(&self.name, &property.name, "empty property tag"));
        }

        let any_getters: Vec<&Property> = self.properties.iter().filter(|p| p.is_any_getter()).collect();
        if any_getters.len() > 1 {
            return Err(Error::schema(
                &self.name,
                any_getters[1].name(),
                format!(
                    "at most one any-getter is allowed, '{}' is already one",
                    any_getters[0].name()
                ),
            ));
        }

        Ok(Arc::new(TypeDescriptor {
            id: NEXT_TYPE_ID.fetch_add(1, AtomicOrdering::Relaxed),
            name: self.name,
            tag: self.tag,
            properties: self.properties,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unannotated_property_defaults() {
        let descriptor = TypeDescriptor::builder("T").property("a", |p| p).build().unwrap();
        let a = &descriptor.properties()[0];

        assert_eq!(a.name(), "a");
        assert_eq!(a.order(), 0);
        assert!(a.yaml_property().is_none());
        assert!(!a.is_any_getter());
    }

    #[test]
    fn test_key_override_renames_property() {
        let descriptor = TypeDescriptor::builder("T")
            .property("first_name", |p| p.key("firstName").order(3))
            .build()
            .unwrap();
        let p = &descriptor.properties()[0];

        assert_eq!(p.name(), "firstName");
        assert_eq!(p.field(), "first_name");
        assert_eq!(p.order(), 3);
        assert!(descriptor.has_field("first_name"));
        assert!(descriptor.property("firstName").is_some());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = TypeDescriptor::builder("T")
            .property("a", |p| p)
            .property("b", |p| p.key("a"))
            .build()
            .unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_second_any_getter_rejected() {
        let err = TypeDescriptor::builder("T")
            .property("x", |p| p.any_getter())
            .property("y", |p| p.any_getter())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at most one any-getter"));
    }

    #[test]
    fn test_empty_tags_rejected() {
        let err = TypeDescriptor::builder("T").tag(Tag::new("")).build().unwrap_err();
        assert!(err.to_string().contains("empty type tag"));

        let err = TypeDescriptor::builder("T")
            .property("a", |p| p.tag(Tag::new("!")))
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Schema error in T.a: empty property tag");
    }

    #[test]
    fn test_descriptor_identity_is_unique() {
        let a = TypeDescriptor::builder("Same").build().unwrap();
        let b = TypeDescriptor::builder("Same").build().unwrap();
        assert_ne!(a.id(), b.id());
    }
}

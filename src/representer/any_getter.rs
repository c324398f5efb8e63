//! Any-getter flattening.
//!
//! The entries of the any-getter property's mapping are hoisted into the
//! enclosing mapping: the any-getter tuple is removed and its children are
//! appended, in their own order, after the remaining parent tuples. Only one
//! level is flattened and duplicate keys are kept.

use crate::error::{Error, Result};
use crate::node::{MappingNode, Node};
use crate::property::Property;

/// Flatten the any-getter property of `properties` into `mapping`.
///
/// Returns the mapping unchanged if no property is an any-getter or if its
/// tuple is absent (for example because it was skipped).
///
/// # Errors
///
/// `Error::Schema` if the any-getter's value node is not a mapping.
pub fn flatten_any_getter(
    type_name: &str,
    properties: &[Property],
    mut mapping: MappingNode,
) -> Result<MappingNode> {
    let Some(any_getter) = properties.iter().find(|p| p.is_any_getter()) else {
        return Ok(mapping);
    };
    let name = any_getter.name();

    let Some(index) = mapping.value.iter().position(|t| t.key_str() == Some(name)) else {
        return Ok(mapping);
    };

    if !matches!(mapping.value[index].value, Node::Mapping(_)) {
        return Err(Error::schema(
            type_name,
            name,
            format!(
                "any-getter value must be a mapping, got a {}",
                mapping.value[index].value.kind()
            ),
        ));
    }

    let tuple = mapping.value.remove(index);
    if let Node::Mapping(inner) = tuple.value {
        tracing::trace!(
            "flattening {} entries of {}.{}",
            inner.value.len(),
            type_name,
            name
        );
        mapping.value.extend(inner.value);
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeTuple, Tag};
    use crate::property::TypeDescriptor;

    fn mapping(entries: Vec<(&str, Node)>) -> MappingNode {
        let mut m = MappingNode::new(Tag::MAP);
        for (k, v) in entries {
            m.push(NodeTuple::new(Node::str(k), v));
        }
        m
    }

    fn properties() -> Vec<Property> {
        TypeDescriptor::builder("T")
            .property("name", |p| p)
            .property("extra", |p| p.any_getter())
            .property("tail", |p| p)
            .build()
            .unwrap()
            .properties()
            .to_vec()
    }

    #[test]
    fn test_children_appended_at_end() {
        let inner = mapping(vec![("k1", Node::str("v1")), ("k2", Node::str("v2"))]);
        let parent = mapping(vec![
            ("name", Node::str("n")),
            ("extra", Node::Mapping(inner)),
            ("tail", Node::str("t")),
        ]);

        let flat = flatten_any_getter("T", &properties(), parent).unwrap();
        assert_eq!(flat.keys(), vec!["name", "tail", "k1", "k2"]);
        assert!(flat.get("extra").is_none());
    }

    #[test]
    fn test_no_any_getter_is_identity() {
        let plain: Vec<Property> = TypeDescriptor::builder("T")
            .property("extra", |p| p)
            .build()
            .unwrap()
            .properties()
            .to_vec();
        let parent = mapping(vec![("extra", Node::str("x"))]);

        let result = flatten_any_getter("T", &plain, parent.clone()).unwrap();
        assert_eq!(result, parent);
    }

    #[test]
    fn test_missing_tuple_is_identity() {
        let parent = mapping(vec![("name", Node::str("n"))]);
        let result = flatten_any_getter("T", &properties(), parent.clone()).unwrap();
        assert_eq!(result, parent);
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let inner = mapping(vec![("name", Node::str("shadow"))]);
        let parent = mapping(vec![("name", Node::str("n")), ("extra", Node::Mapping(inner))]);

        let flat = flatten_any_getter("T", &properties(), parent).unwrap();
        assert_eq!(flat.keys(), vec!["name", "name"]);
    }

    #[test]
    fn test_nested_mapping_not_flattened_further() {
        let deep = mapping(vec![("z", Node::str("1"))]);
        let inner = mapping(vec![("nested", Node::Mapping(deep.clone()))]);
        let parent = mapping(vec![("extra", Node::Mapping(inner))]);

        let flat = flatten_any_getter("T", &properties(), parent).unwrap();
        assert_eq!(flat.keys(), vec!["nested"]);
        assert_eq!(flat.get("nested"), Some(&Node::Mapping(deep)));
    }

    #[test]
    fn test_non_mapping_value_is_schema_error() {
        let parent = mapping(vec![("extra", Node::str("scalar"))]);

        let err = flatten_any_getter("T", &properties(), parent).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("got a scalar"));
    }
}

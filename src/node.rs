//! YAML node tree produced by the representer.
//!
//! Nodes sit between the runtime [`Value`](crate::Value) model and YAML text:
//! the representer builds a `Node` tree, the any-getter flattener rewrites
//! mapping nodes in place, and the result is serialized with `serde_yaml`.

use std::borrow::Cow;
use std::fmt;

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_yaml::{Number, Value as YamlValue};

const CORE_PREFIX: &str = "tag:yaml.org,2002:";

/// A YAML tag. Standard tags live in the `tag:yaml.org,2002:` namespace;
/// anything else is treated as an application tag and emitted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    pub const NULL: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:null"));
    pub const BOOL: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:bool"));
    pub const INT: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:int"));
    pub const FLOAT: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:float"));
    pub const STR: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:str"));
    pub const SEQ: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:seq"));
    pub const SET: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:set"));
    pub const MAP: Tag = Tag(Cow::Borrowed("tag:yaml.org,2002:map"));

    /// Create an application tag, e.g. `Tag::new("!Widget")`.
    pub fn new(tag: impl Into<String>) -> Self {
        Tag(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for tags in the YAML core schema namespace.
    pub fn is_standard(&self) -> bool {
        self.0.starts_with(CORE_PREFIX)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.strip_prefix(CORE_PREFIX) {
            Some(short) => write!(f, "!!{}", short),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A scalar node: tag plus canonical text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    pub tag: Tag,
    pub value: String,
}

/// A sequence node.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNode {
    pub tag: Tag,
    pub value: Vec<Node>,
}

/// One `(key, value)` entry of a mapping node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTuple {
    pub key: Node,
    pub value: Node,
}

impl NodeTuple {
    pub fn new(key: Node, value: Node) -> Self {
        Self { key, value }
    }

    /// The key's scalar text, if the key is a scalar.
    pub fn key_str(&self) -> Option<&str> {
        self.key.scalar_value()
    }
}

/// A mapping node. Tuples keep insertion order and may repeat keys.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingNode {
    pub tag: Tag,
    pub value: Vec<NodeTuple>,
}

impl MappingNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            value: Vec::new(),
        }
    }

    pub fn push(&mut self, tuple: NodeTuple) {
        self.value.push(tuple);
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Scalar keys in tuple order.
    pub fn keys(&self) -> Vec<&str> {
        self.value.iter().filter_map(NodeTuple::key_str).collect()
    }

    /// First value stored under a scalar key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.value
            .iter()
            .find(|t| t.key_str() == Some(key))
            .map(|t| &t.value)
    }
}

/// A node in the YAML representation graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(ScalarNode),
    Sequence(SequenceNode),
    Mapping(MappingNode),
}

impl Node {
    pub fn scalar(tag: Tag, value: impl Into<String>) -> Self {
        Node::Scalar(ScalarNode {
            tag,
            value: value.into(),
        })
    }

    /// Plain `!!str` scalar, used for property keys.
    pub fn str(value: impl Into<String>) -> Self {
        Self::scalar(Tag::STR, value)
    }

    pub fn tag(&self) -> &Tag {
        match self {
            Node::Scalar(n) => &n.tag,
            Node::Sequence(n) => &n.tag,
            Node::Mapping(n) => &n.tag,
        }
    }

    pub fn set_tag(&mut self, tag: Tag) {
        match self {
            Node::Scalar(n) => n.tag = tag,
            Node::Sequence(n) => n.tag = tag,
            Node::Mapping(n) => n.tag = tag,
        }
    }

    pub fn scalar_value(&self) -> Option<&str> {
        match self {
            Node::Scalar(n) => Some(&n.value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingNode> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceNode> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the node kind for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    /// Tag text without its leading `!`, or `None` for standard tags.
    fn application_tag(&self) -> Option<&str> {
        let tag = self.tag();
        if tag.is_standard() {
            None
        } else {
            Some(tag.as_str().strip_prefix('!').unwrap_or(tag.as_str()))
        }
    }
}

/// Emits the node through any `serde` serializer.
///
/// Mapping tuples are written one by one, so repeated keys (for example a
/// flattened any-getter entry shadowing a parent key) all reach the output.
/// Application tags are written the way `serde_yaml` writes a
/// [`TaggedValue`](serde_yaml::value::TaggedValue): a one-entry map keyed by
/// `!tag`.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.application_tag() {
            None => Untagged(self).serialize(serializer),
            Some("") => Err(S::Error::custom(format!(
                "empty YAML tag on {} node",
                self.kind()
            ))),
            Some(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&format!("!{}", name), &Untagged(self))?;
                map.end()
            }
        }
    }
}

struct Untagged<'a>(&'a Node);

impl Serialize for Untagged<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Node::Scalar(n) => scalar_to_yaml(n).serialize(serializer),
            Node::Sequence(n) => serializer.collect_seq(&n.value),
            Node::Mapping(n) => {
                // No length hint: serde_yaml reads a one-entry map with a
                // `!`-prefixed key as a tag.
                let mut map = serializer.serialize_map(None)?;
                for tuple in &n.value {
                    map.serialize_entry(&tuple.key, &tuple.value)?;
                }
                map.end()
            }
        }
    }
}

fn scalar_to_yaml(node: &ScalarNode) -> YamlValue {
    let text = node.value.as_str();
    if node.tag == Tag::NULL {
        YamlValue::Null
    } else if node.tag == Tag::BOOL {
        match text {
            "true" => YamlValue::Bool(true),
            "false" => YamlValue::Bool(false),
            _ => YamlValue::String(text.to_string()),
        }
    } else if node.tag == Tag::INT {
        text.parse::<i64>()
            .map(|i| YamlValue::Number(Number::from(i)))
            .unwrap_or_else(|_| YamlValue::String(text.to_string()))
    } else if node.tag == Tag::FLOAT {
        text.parse::<f64>()
            .map(|f| YamlValue::Number(Number::from(f)))
            .unwrap_or_else(|_| YamlValue::String(text.to_string()))
    } else {
        YamlValue::String(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, &str)]) -> MappingNode {
        let mut m = MappingNode::new(Tag::MAP);
        for (k, v) in entries {
            m.push(NodeTuple::new(Node::str(*k), Node::str(*v)));
        }
        m
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::STR.to_string(), "!!str");
        assert_eq!(Tag::new("!Widget").to_string(), "!Widget");
        assert!(Tag::MAP.is_standard());
        assert!(!Tag::new("!Widget").is_standard());
    }

    #[test]
    fn test_mapping_keys_and_get() {
        let m = mapping(&[("a", "1"), ("b", "2")]);
        assert_eq!(m.keys(), vec!["a", "b"]);
        assert_eq!(m.get("b").and_then(Node::scalar_value), Some("2"));
        assert!(m.get("c").is_none());
    }

    #[test]
    fn test_scalar_conversion_by_tag() {
        let convert = |tag: Tag, text: &str| scalar_to_yaml(&ScalarNode { tag, value: text.to_string() });

        assert_eq!(convert(Tag::NULL, "null"), YamlValue::Null);
        assert_eq!(convert(Tag::BOOL, "true"), YamlValue::Bool(true));
        assert_eq!(convert(Tag::INT, "42"), YamlValue::Number(Number::from(42)));
        assert_eq!(convert(Tag::STR, "42"), YamlValue::String("42".to_string()));
    }

    #[test]
    fn test_application_tag_emits_tagged_value() {
        let mut node = Node::Mapping(mapping(&[("a", "x")]));
        node.set_tag(Tag::new("!Widget"));

        let text = serde_yaml::to_string(&node).unwrap();
        assert_eq!(text, "!Widget\na: x\n");
    }

    #[test]
    fn test_tagged_scalar() {
        let node = Node::scalar(Tag::new("!Color"), "red");
        assert_eq!(serde_yaml::to_string(&node).unwrap(), "!Color red\n");
    }

    #[test]
    fn test_duplicate_keys_are_all_emitted() {
        let node = Node::Mapping(mapping(&[("k", "first"), ("k", "second")]));

        let text = serde_yaml::to_string(&node).unwrap();
        assert_eq!(text, "k: first\nk: second\n");
    }

    #[test]
    fn test_empty_tag_is_an_error() {
        for tag in ["", "!"] {
            let node = Node::scalar(Tag::new(tag), "x");
            let err = serde_yaml::to_string(&node).unwrap_err();
            assert!(err.to_string().contains("empty YAML tag"));
        }
    }
}

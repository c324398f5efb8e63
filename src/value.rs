//! Runtime value model reflected by the representer.
//!
//! Rust has no runtime reflection, so objects are reflected explicitly: a
//! type implements [`ToYaml`] and turns itself into a [`Value`] tree. Struct
//! types become [`ObjectValue`]s that pair their field values with a
//! [`TypeDescriptor`] carrying the property metadata.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::property::TypeDescriptor;

/// Dynamic value handed to the representer.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Set(Vec<Value>),
    Mapping(IndexMap<String, Value>),
    Object(ObjectValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Number of elements for strings and containers, `None` otherwise.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.len()),
            Value::Sequence(items) | Value::Set(items) => Some(items.len()),
            Value::Mapping(map) => Some(map.len()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Name of the runtime kind, used in log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Set(_) => "set",
            Value::Mapping(_) => "mapping",
            Value::Object(_) => "object",
        }
    }

    /// Reflect a `serde_yaml::Value`. Non-string mapping keys are rendered
    /// to their YAML text; tags are dropped.
    pub fn from_yaml(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    u.to_yaml()
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Value::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Value::from_yaml(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(tagged.value),
        }
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(l) | Value::Set(l) => write!(f, "{:?}", l),
            Value::Mapping(m) => write!(f, "{:?}", m),
            Value::Object(o) => write!(f, "{}{:?}", o.descriptor.name(), o.fields),
        }
    }
}

/// A reflected struct instance: field values plus the type's metadata.
#[derive(Debug, Clone)]
pub struct ObjectValue {
    descriptor: Arc<TypeDescriptor>,
    fields: IndexMap<String, Value>,
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.id() == other.descriptor.id() && self.fields == other.fields
    }
}

impl ObjectValue {
    pub fn new(descriptor: Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with(mut self, field: impl Into<String>, value: impl ToYaml) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl ToYaml) {
        self.fields.insert(field.into(), value.to_yaml());
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    /// Value of a field; fields never assigned reflect as `Value::Null`.
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&Value::Null)
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Reflect any `Serialize` struct onto a descriptor.
    ///
    /// The struct is serialized through `serde_yaml`; each top-level entry
    /// whose name matches a descriptor field becomes that field's value.
    /// Entries with no matching property are ignored.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Serialize)]
    /// struct Server { host: String, port: u16 }
    ///
    /// let descriptor = TypeDescriptor::builder("Server")
    ///     .property("host", |p| p.order(10))
    ///     .property("port", |p| p)
    ///     .build()?;
    /// let object = ObjectValue::from_serialize(descriptor, &server)?;
    /// ```
    pub fn from_serialize<T: Serialize>(descriptor: Arc<TypeDescriptor>, value: &T) -> Result<Self> {
        let yaml = serde_yaml::to_value(value)?;
        let map = match yaml {
            serde_yaml::Value::Mapping(map) => map,
            other => {
                return Err(Error::schema(
                    descriptor.name(),
                    "",
                    format!("expected a struct or map, got {:?}", other),
                ))
            }
        };

        let mut object = ObjectValue::new(descriptor);
        for (key, value) in map {
            let key = yaml_key_to_string(key);
            if object.descriptor.has_field(&key) {
                object.fields.insert(key, Value::from_yaml(value));
            }
        }
        Ok(object)
    }
}

/// Reflection into the runtime [`Value`] model.
pub trait ToYaml {
    fn to_yaml(&self) -> Value;
}

impl ToYaml for Value {
    fn to_yaml(&self) -> Value {
        self.clone()
    }
}

impl ToYaml for ObjectValue {
    fn to_yaml(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl ToYaml for bool {
    fn to_yaml(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! int_to_yaml {
    ($($ty:ty),*) => {
        $(impl ToYaml for $ty {
            fn to_yaml(&self) -> Value {
                Value::Int(*self as i64)
            }
        })*
    };
}

int_to_yaml!(i8, i16, i32, i64, u8, u16, u32, isize);

// Values beyond i64::MAX fall back to text.
impl ToYaml for u64 {
    fn to_yaml(&self) -> Value {
        i64::try_from(*self)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(self.to_string()))
    }
}

impl ToYaml for usize {
    fn to_yaml(&self) -> Value {
        (*self as u64).to_yaml()
    }
}

impl ToYaml for f32 {
    fn to_yaml(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToYaml for f64 {
    fn to_yaml(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToYaml for str {
    fn to_yaml(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToYaml for String {
    fn to_yaml(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToYaml + ?Sized> ToYaml for &T {
    fn to_yaml(&self) -> Value {
        (**self).to_yaml()
    }
}

impl<T: ToYaml> ToYaml for Option<T> {
    fn to_yaml(&self) -> Value {
        match self {
            Some(v) => v.to_yaml(),
            None => Value::Null,
        }
    }
}

impl<T: ToYaml> ToYaml for [T] {
    fn to_yaml(&self) -> Value {
        Value::Sequence(self.iter().map(ToYaml::to_yaml).collect())
    }
}

impl<T: ToYaml, const N: usize> ToYaml for [T; N] {
    fn to_yaml(&self) -> Value {
        self.as_slice().to_yaml()
    }
}

impl<T: ToYaml> ToYaml for Vec<T> {
    fn to_yaml(&self) -> Value {
        self.as_slice().to_yaml()
    }
}

impl<T: ToYaml, S> ToYaml for HashSet<T, S> {
    fn to_yaml(&self) -> Value {
        Value::Set(self.iter().map(ToYaml::to_yaml).collect())
    }
}

impl<T: ToYaml> ToYaml for BTreeSet<T> {
    fn to_yaml(&self) -> Value {
        Value::Set(self.iter().map(ToYaml::to_yaml).collect())
    }
}

impl<K: AsRef<str>, V: ToYaml, S> ToYaml for HashMap<K, V, S> {
    fn to_yaml(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_yaml()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: ToYaml> ToYaml for BTreeMap<K, V> {
    fn to_yaml(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_yaml()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: ToYaml, S> ToYaml for IndexMap<K, V, S> {
    fn to_yaml(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_yaml()))
                .collect(),
        )
    }
}

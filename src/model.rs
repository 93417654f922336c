//! Operation model consumed by the script serializer.
//!
//! These are plain data shapes. They are produced by the markup reader (or
//! deserialized from JSON), borrowed once by the serializer, and dropped.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address key that names a subsystem.
pub const SUBSYSTEM: &str = "subsystem";

/// Action that creates a resource.
pub const ADD: &str = "add";

/// Parameter names that carry the operation name and address in the flat
/// management model. They are never rendered as parameters.
pub const RESERVED_PARAMETERS: &[&str] = &["operation", "address"];

/// One `key=value` step in a resource address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressSegment {
    pub key: String,
    pub value: String,
}

impl AddressSegment {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered path of segments identifying a resource. The empty address is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<AddressSegment>);

impl Address {
    /// The root address (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build an address from `(key, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| AddressSegment::new(k, v))
                .collect(),
        )
    }

    /// Address of the named subsystem, e.g. `/subsystem=foo`.
    pub fn subsystem(name: impl Into<String>) -> Self {
        Self(vec![AddressSegment::new(SUBSYSTEM, name)])
    }

    /// A new address one level below this one.
    pub fn child(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(AddressSegment::new(key, value));
        Self(segments)
    }

    pub fn segments(&self) -> &[AddressSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressSegment> {
        self.0.iter()
    }
}

impl From<Vec<AddressSegment>> for Address {
    fn from(segments: Vec<AddressSegment>) -> Self {
        Self(segments)
    }
}

impl<'a> IntoIterator for &'a Address {
    type Item = &'a AddressSegment;
    type IntoIter = std::slice::Iter<'a, AddressSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// Leaf string, quoted when rendered.
    Scalar(String),
    /// Object/list/property literal already in console syntax, rendered verbatim.
    Structured(String),
}

impl Value {
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::Scalar(text.into())
    }

    pub fn structured(literal: impl Into<String>) -> Self {
        Self::Structured(literal.into())
    }
}

/// Parameters in declaration order. `None` means undefined and is never rendered.
pub type Parameters = IndexMap<String, Option<Value>>;

/// A single management operation: address, action name and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub address: Address,
    pub action: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl Operation {
    pub fn new(address: Address, action: impl Into<String>) -> Self {
        Self {
            address,
            action: action.into(),
            parameters: Parameters::new(),
        }
    }

    /// An `add` operation at `address`.
    pub fn add(address: Address) -> Self {
        Self::new(address, ADD)
    }

    /// Builder-style parameter insertion.
    pub fn with_parameter(mut self, name: impl Into<String>, value: Option<Value>) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Shorthand for a defined scalar parameter.
    pub fn with_scalar(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_parameter(name, Some(Value::scalar(text)))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::scripts::operation::format_operation(self))
    }
}

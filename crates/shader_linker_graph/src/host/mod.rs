// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only view of the host application's shader node graph.
//!
//! The host owns its node graph and exposes it through accessor calls. The
//! translation engine only ever reads through these traits, so any host
//! (an embedded scripting bridge, a snapshot file, a test fixture) can be
//! plugged in by implementing them.
//!
//! Type-specific node properties are dynamic: the available field names vary
//! across host versions. They are exposed as [`HostValue`]s through
//! [`PropertySource`] and resolved by capability probing (see
//! [`crate::probe`]).

pub mod memory;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use memory::{MemoryHost, MemoryLink, MemoryMaterial, MemoryNode, MemorySocket, SnapshotError};

/// Dynamic value of a host property or socket default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostValue {
    /// Property exists but holds nothing (an unassigned image, for example)
    Null,
    /// Boolean
    Bool(bool),
    /// Integer or enum index
    Int(i64),
    /// Floating point
    Float(f64),
    /// String or enum identifier
    String(String),
    /// Sequence (vectors, colors, collections)
    List(Vec<HostValue>),
    /// Nested host object with its own properties
    Object(IndexMap<String, HostValue>),
}

impl HostValue {
    /// Build an object value from `(name, value)` pairs
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, HostValue)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether this is [`HostValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric value as `f64` (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// List items
    pub fn as_list(&self) -> Option<&[HostValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// All list items as numbers, `None` if any item is not numeric
    pub fn as_floats(&self) -> Option<Vec<f64>> {
        self.as_list()?.iter().map(HostValue::as_f64).collect()
    }

    /// Textual form used for enum matching.
    ///
    /// Strings are returned as-is; other scalars are formatted, `Null` reads
    /// as `"None"` the way host enums print when unset.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(v) => Some(v.clone()),
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Bool(v) => Some(if *v { "True" } else { "False" }.to_string()),
            Self::Null => Some("None".to_string()),
            Self::List(_) | Self::Object(_) => None,
        }
    }
}

impl PropertySource for HostValue {
    fn property(&self, name: &str) -> Option<HostValue> {
        match self {
            Self::Object(fields) => fields.get(name).cloned(),
            _ => None,
        }
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for HostValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(v: Vec<HostValue>) -> Self {
        Self::List(v)
    }
}

impl<const N: usize> From<[f64; N]> for HostValue {
    fn from(v: [f64; N]) -> Self {
        Self::List(v.iter().copied().map(HostValue::Float).collect())
    }
}

/// Anything that exposes named, dynamically typed properties
pub trait PropertySource {
    /// Look up a property; `None` means the field does not exist
    fn property(&self, name: &str) -> Option<HostValue>;
}

/// An input or output socket on a host node
pub trait HostSocket {
    /// Display name
    fn name(&self) -> &str;

    /// Unique identifier within the node; links refer to sockets by it
    fn identifier(&self) -> &str {
        self.name()
    }

    /// Literal value used when nothing drives the socket
    fn default_value(&self) -> Option<HostValue>;

    /// Disabled sockets are hidden by the host and not exported
    fn is_enabled(&self) -> bool {
        true
    }
}

/// A node in the host shader graph
pub trait HostNode: PropertySource {
    /// Host-unique node name
    fn name(&self) -> &str;

    /// Host type id (`ShaderNodeTexImage`, ...)
    fn type_id(&self) -> &str;

    /// Editor location
    fn location(&self) -> [f32; 2];

    /// Input sockets in host order
    fn inputs(&self) -> Vec<&dyn HostSocket>;

    /// Output sockets in host order
    fn outputs(&self) -> Vec<&dyn HostSocket>;
}

/// A link between two sockets, referenced by node name and socket identifier
pub trait HostLink {
    /// Source node name
    fn from_node(&self) -> &str;
    /// Source socket identifier
    fn from_socket(&self) -> &str;
    /// Destination node name
    fn to_node(&self) -> &str;
    /// Destination socket identifier
    fn to_socket(&self) -> &str;

    /// Muted links carry no data
    fn is_muted(&self) -> bool {
        false
    }
}

/// A material and its node tree
pub trait HostMaterial {
    /// Material name
    fn name(&self) -> &str;
    /// Nodes in host order
    fn nodes(&self) -> Vec<&dyn HostNode>;
    /// Links in host order
    fn links(&self) -> Vec<&dyn HostLink>;
}

/// The host application as seen by the collector
pub trait Host {
    /// Material currently active in the host, if any
    fn active_material(&self) -> Option<&dyn HostMaterial>;

    /// Resolve a host-relative path (`//textures/a.png`) to an absolute one
    fn absolute_path(&self, path: &str) -> Option<String>;
}

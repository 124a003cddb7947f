// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter values carried by portable nodes.

use crate::host::HostValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-node parameter set, keyed by parameter name, in insertion order
pub type ParamMap = IndexMap<String, ParamValue>;

/// Value that can be stored in a node's parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean
    Bool(bool),
    /// Integer or enum index
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Nested sequence (vectors, colors, color ramp stops)
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Convert a literal host value.
    ///
    /// Nested objects and nulls have no portable form and yield `None`, as
    /// does any list containing one.
    pub fn from_host(value: &HostValue) -> Option<Self> {
        match value {
            HostValue::Null | HostValue::Object(_) => None,
            HostValue::Bool(v) => Some(Self::Bool(*v)),
            HostValue::Int(v) => Some(Self::Int(*v)),
            HostValue::Float(v) => Some(Self::Float(*v)),
            HostValue::String(v) => Some(Self::String(v.clone())),
            HostValue::List(items) => items
                .iter()
                .map(Self::from_host)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
        }
    }

    /// Float list
    pub fn floats(values: &[f64]) -> Self {
        Self::List(values.iter().copied().map(Self::Float).collect())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(v: Vec<ParamValue>) -> Self {
        Self::List(v)
    }
}

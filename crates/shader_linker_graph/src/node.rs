// SPDX-License-Identifier: MIT OR Apache-2.0
//! Portable node definitions.

use crate::value::{ParamMap, ParamValue};
use serde::{Deserialize, Serialize};

/// The handler-writable part of a portable node.
///
/// The collector fills it with generic values (mapped class, enabled socket
/// names); a handler may then override any of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInfo {
    /// Portable class name
    pub class: String,
    /// Input socket names
    pub inputs: Vec<String>,
    /// Output socket names
    pub outputs: Vec<String>,
}

impl NodeInfo {
    /// Create node info for a class with no sockets
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Replace the input socket names
    pub fn set_inputs<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = names.into_iter().map(Into::into).collect();
    }

    /// Replace the output socket names
    pub fn set_outputs<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = names.into_iter().map(Into::into).collect();
    }
}

/// A node in the portable document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableNode {
    /// Document-unique id
    pub id: String,
    /// Portable class name
    pub class: String,
    /// Editor position
    pub position: [f32; 2],
    /// Input socket names
    pub inputs: Vec<String>,
    /// Output socket names
    pub outputs: Vec<String>,
    /// Type-specific parameters and unconnected socket values
    pub params: ParamMap,
}

impl PortableNode {
    /// Assemble a node from its id, position, info and params
    pub fn new(id: impl Into<String>, position: [f32; 2], info: NodeInfo, params: ParamMap) -> Self {
        Self {
            id: id.into(),
            class: info.class,
            position,
            inputs: info.inputs,
            outputs: info.outputs,
            params,
        }
    }

    /// Get a parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_serialization_shape() {
        let mut info = NodeInfo::new("MathModule");
        info.set_inputs(["Value", "Value_001"]);
        info.set_outputs(["Value"]);

        let mut params = ParamMap::new();
        params.insert("value".to_string(), ParamValue::Float(0.5));

        let node = PortableNode::new("Math_000", [10.0, -20.0], info, params);
        assert_eq!(node.param("value"), Some(&ParamValue::Float(0.5)));

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({
                "id": "Math_000",
                "class": "MathModule",
                "position": [10.0, -20.0],
                "inputs": ["Value", "Value_001"],
                "outputs": ["Value"],
                "params": {"value": 0.5}
            })
        );
    }
}

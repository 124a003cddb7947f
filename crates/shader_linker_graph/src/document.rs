// SPDX-License-Identifier: MIT OR Apache-2.0
//! The transmittable document: nodes plus links.

use crate::link::PortableLink;
use crate::node::PortableNode;
use serde::{Deserialize, Serialize};

/// Portable description of one material's node graph.
///
/// Serializes to `{"nodes": [...], "links": [...]}`; consumers depend on
/// exactly these top-level keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortableDocument {
    /// Nodes in host order
    pub nodes: Vec<PortableNode>,
    /// Links in host order
    pub links: Vec<PortableLink>,
}

impl PortableDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the document has neither nodes nor links
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Get a node by id
    pub fn node(&self, id: &str) -> Option<&PortableNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Serialize to JSON bytes for transmission
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeInfo;
    use crate::value::ParamMap;

    #[test]
    fn test_empty_document_wire_format() {
        let doc = PortableDocument::new();
        assert!(doc.is_empty());
        assert_eq!(
            String::from_utf8(doc.to_json_bytes().unwrap()).unwrap(),
            r#"{"nodes":[],"links":[]}"#
        );
    }

    #[test]
    fn test_lookup() {
        let doc = PortableDocument {
            nodes: vec![
                PortableNode::new("A_000", [0.0, 0.0], NodeInfo::new("AModule"), ParamMap::new()),
                PortableNode::new("B_001", [0.0, 0.0], NodeInfo::new("BModule"), ParamMap::new()),
            ],
            links: vec![PortableLink::new("A_000", "Color", "B_001", "Color")],
        };

        assert_eq!(doc.node("B_001").map(|n| n.class.as_str()), Some("BModule"));
        assert!(doc.node("C_002").is_none());
    }
}

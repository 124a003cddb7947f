// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory host graph.
//!
//! Owns a snapshot of a host material so the collector can run without the
//! host application: from a JSON export, or built up in tests.

use super::{Host, HostLink, HostMaterial, HostNode, HostSocket, HostValue, PropertySource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of host-relative paths
const RELATIVE_PREFIX: &str = "//";

/// Error loading a host snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot file could not be read
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON for the host model
    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host snapshot: an optional active material plus the document directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    /// Directory host-relative paths resolve against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Active material
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_material: Option<MemoryMaterial>,
}

impl MemoryHost {
    /// Host with no active material
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active material
    pub fn with_material(mut self, material: MemoryMaterial) -> Self {
        self.active_material = Some(material);
        self
    }

    /// Set the directory `//` paths resolve against
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON snapshot from disk
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        let mut host = Self::from_json(&contents)?;

        // Relative paths in a snapshot are relative to the snapshot itself
        if host.base_dir.is_none() {
            host.base_dir = path.parent().map(Path::to_path_buf);
        }

        tracing::debug!("Loaded host snapshot from {:?}", path);
        Ok(host)
    }
}

impl Host for MemoryHost {
    fn active_material(&self) -> Option<&dyn HostMaterial> {
        self.active_material
            .as_ref()
            .map(|m| m as &dyn HostMaterial)
    }

    fn absolute_path(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }

        let Some(relative) = path.strip_prefix(RELATIVE_PREFIX) else {
            return Some(path.to_string());
        };

        let base = self
            .base_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())?;
        Some(base.join(relative).to_string_lossy().into_owned())
    }
}

/// A material with its node tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMaterial {
    /// Material name
    pub name: String,
    /// Nodes in host order
    #[serde(default)]
    pub nodes: Vec<MemoryNode>,
    /// Links in host order
    #[serde(default)]
    pub links: Vec<MemoryLink>,
}

impl MemoryMaterial {
    /// Create an empty material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Add a node
    pub fn with_node(mut self, node: MemoryNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a link
    pub fn with_link(mut self, link: MemoryLink) -> Self {
        self.links.push(link);
        self
    }

    /// Add a link from `from_node.from_socket` to `to_node.to_socket`
    pub fn link(
        self,
        from_node: &str,
        from_socket: &str,
        to_node: &str,
        to_socket: &str,
    ) -> Self {
        self.with_link(MemoryLink::new(from_node, from_socket, to_node, to_socket))
    }
}

impl HostMaterial for MemoryMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn nodes(&self) -> Vec<&dyn HostNode> {
        self.nodes.iter().map(|n| n as &dyn HostNode).collect()
    }

    fn links(&self) -> Vec<&dyn HostLink> {
        self.links.iter().map(|l| l as &dyn HostLink).collect()
    }
}

/// A node with its sockets and type-specific properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Host-unique name
    pub name: String,
    /// Host type id
    #[serde(rename = "type")]
    pub type_id: String,
    /// Editor location
    #[serde(default)]
    pub location: [f32; 2],
    /// Input sockets
    #[serde(default)]
    pub inputs: Vec<MemorySocket>,
    /// Output sockets
    #[serde(default)]
    pub outputs: Vec<MemorySocket>,
    /// Type-specific properties
    #[serde(default)]
    pub properties: IndexMap<String, HostValue>,
}

impl MemoryNode {
    /// Create a node at the origin with no sockets
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            location: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Set the location
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.location = [x, y];
        self
    }

    /// Add an input socket
    pub fn with_input(mut self, socket: MemorySocket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Add an output socket
    pub fn with_output(mut self, socket: MemorySocket) -> Self {
        self.outputs.push(socket);
        self
    }

    /// Set a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<HostValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl PropertySource for MemoryNode {
    fn property(&self, name: &str) -> Option<HostValue> {
        self.properties.get(name).cloned()
    }
}

impl HostNode for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_id(&self) -> &str {
        &self.type_id
    }

    fn location(&self) -> [f32; 2] {
        self.location
    }

    fn inputs(&self) -> Vec<&dyn HostSocket> {
        self.inputs.iter().map(|s| s as &dyn HostSocket).collect()
    }

    fn outputs(&self) -> Vec<&dyn HostSocket> {
        self.outputs.iter().map(|s| s as &dyn HostSocket).collect()
    }
}

fn enabled_by_default() -> bool {
    true
}

/// A socket with an optional literal default
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySocket {
    /// Display name
    pub name: String,
    /// Identifier, when it differs from the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Literal default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<HostValue>,
    /// Whether the host shows the socket
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl MemorySocket {
    /// Create an enabled socket without a default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            default_value: None,
            enabled: true,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<HostValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set an identifier distinct from the name
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Mark as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl HostSocket for MemorySocket {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.name)
    }

    fn default_value(&self) -> Option<HostValue> {
        self.default_value.clone()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A link between sockets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLink {
    /// Source node name
    pub from_node: String,
    /// Source socket identifier
    pub from_socket: String,
    /// Destination node name
    pub to_node: String,
    /// Destination socket identifier
    pub to_socket: String,
    /// Whether the link is muted
    #[serde(default)]
    pub muted: bool,
}

impl MemoryLink {
    /// Create an unmuted link
    pub fn new(
        from_node: impl Into<String>,
        from_socket: impl Into<String>,
        to_node: impl Into<String>,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_socket: from_socket.into(),
            to_node: to_node.into(),
            to_socket: to_socket.into(),
            muted: false,
        }
    }

    /// Mark as muted
    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }
}

impl HostLink for MemoryLink {
    fn from_node(&self) -> &str {
        &self.from_node
    }

    fn from_socket(&self) -> &str {
        &self.from_socket
    }

    fn to_node(&self) -> &str {
        &self.to_node
    }

    fn to_socket(&self) -> &str {
        &self.to_socket
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node-type handlers and the registry that dispatches to them.
//!
//! A handler translates the type-specific state of one host node type into
//! portable parameters. Handlers are keyed by host type id; node types with
//! no registered handler are exported with generic fields only. Supporting a
//! new node type means registering a new [`NodeHandler`], never branching in
//! the collector.
//!
//! Handler contract:
//! - Missing host fields are expected (the host API drifts between
//!   versions) and are replaced by a documented default.
//! - Malformed data degrades the affected parameter only; the rest of the
//!   node is still translated.
//! - A handler writes its own parameter keys and may override the node's
//!   class and socket lists. Id and position belong to the collector.

pub mod color_ramp;
pub mod separate_color;
pub mod separate_xyz;
pub mod tex_image;
pub mod tex_white_noise;

use crate::host::{Host, HostMaterial, HostNode};
use crate::node::NodeInfo;
use crate::value::ParamMap;
use indexmap::IndexMap;

pub use color_ramp::ColorRampHandler;
pub use separate_color::SeparateColorHandler;
pub use separate_xyz::SeparateXyzHandler;
pub use tex_image::TexImageHandler;
pub use tex_white_noise::TexWhiteNoiseHandler;

/// Host state a handler may consult besides the node itself
pub struct HandlerContext<'a> {
    /// Host application (path resolution)
    pub host: &'a dyn Host,
    /// Material owning the node
    pub material: &'a dyn HostMaterial,
}

/// Error raised by a handler.
///
/// Never reaches the document consumer: the fault boundary logs it and
/// emits the node with generic fields.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A required property is missing
    #[error("Missing property: {0}")]
    MissingProperty(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

/// Translator for one host node type
pub trait NodeHandler: Send + Sync {
    /// Write the node's type-specific parameters into `params`
    fn handle(
        &self,
        node: &dyn HostNode,
        info: &mut NodeInfo,
        params: &mut ParamMap,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError>;
}

impl<F> NodeHandler for F
where
    F: Fn(&dyn HostNode, &mut NodeInfo, &mut ParamMap, &HandlerContext<'_>) -> Result<(), HandlerError>
        + Send
        + Sync,
{
    fn handle(
        &self,
        node: &dyn HostNode,
        info: &mut NodeInfo,
        params: &mut ParamMap,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        self(node, info, params, ctx)
    }
}

/// Registry of node handlers by host type id
pub struct HandlerRegistry {
    /// Registered handlers by type id
    handlers: IndexMap<String, Box<dyn NodeHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Register a handler, replacing any previous one for the type
    pub fn register(&mut self, type_id: impl Into<String>, handler: impl NodeHandler + 'static) {
        self.handlers.insert(type_id.into(), Box::new(handler));
    }

    /// Get the handler for a type id
    pub fn get(&self, type_id: &str) -> Option<&dyn NodeHandler> {
        self.handlers.get(type_id).map(|h| h.as_ref())
    }

    /// Whether a handler is registered for the type id
    pub fn contains(&self, type_id: &str) -> bool {
        self.handlers.contains_key(type_id)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the registry with all built-in shader node handlers
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register("ShaderNodeValToRGB", ColorRampHandler);
    registry.register("ShaderNodeSeparateColor", SeparateColorHandler);
    registry.register("ShaderNodeSeparateXYZ", SeparateXyzHandler);
    registry.register("ShaderNodeTexImage", TexImageHandler);
    registry.register("ShaderNodeTexWhiteNoise", TexWhiteNoiseHandler);

    registry
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::host::{MemoryHost, MemoryMaterial, MemoryNode};

    /// Run a handler on a node with fresh info and params
    pub fn run_with_host(
        handler: &dyn NodeHandler,
        node: &MemoryNode,
        host: &MemoryHost,
    ) -> (NodeInfo, ParamMap) {
        let material = MemoryMaterial::new("Test");
        let ctx = HandlerContext {
            host,
            material: &material,
        };
        let mut info = NodeInfo::new("GenericModule");
        let mut params = ParamMap::new();
        handler
            .handle(node, &mut info, &mut params, &ctx)
            .expect("handler failed");
        (info, params)
    }

    /// Run a handler against a host with no base directory
    pub fn run(handler: &dyn NodeHandler, node: &MemoryNode) -> (NodeInfo, ParamMap) {
        run_with_host(handler, node, &MemoryHost::new())
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph collection: host material graph to portable document.
//!
//! A collection pass walks the active material once:
//! 1. every node gets an id, a class and its unconnected socket values,
//!    then its type handler (if any) runs inside the fault boundary;
//! 2. every live link is re-expressed between portable node ids.
//!
//! The pass is a pure projection of host state; nothing is kept between
//! calls. It never fails: a missing material yields an empty document and a
//! broken node is exported with generic fields.

use crate::document::PortableDocument;
use crate::fault::{FaultBoundary, HandlerOutcome};
use crate::handlers::{builtin_registry, HandlerContext, HandlerRegistry};
use crate::host::{Host, HostLink, HostNode};
use crate::ident::{make_node_id, socket_param_key};
use crate::link::PortableLink;
use crate::node::{NodeInfo, PortableNode};
use crate::type_map::class_name_for;
use crate::value::{ParamMap, ParamValue};
use std::collections::{HashMap, HashSet};

/// Counters for one collection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Nodes emitted
    pub nodes: usize,
    /// Links emitted
    pub links: usize,
    /// Nodes whose handler ran to completion
    pub handled: usize,
    /// Nodes with no registered handler
    pub unhandled: usize,
    /// Nodes whose handler failed or panicked
    pub degraded: usize,
    /// Links skipped because an endpoint node is unknown
    pub dropped_links: usize,
}

impl CollectStats {
    fn record(&mut self, outcome: &HandlerOutcome) {
        match outcome {
            HandlerOutcome::Applied => self.handled += 1,
            HandlerOutcome::Skipped => self.unhandled += 1,
            HandlerOutcome::Failed(_) | HandlerOutcome::Panicked(_) => self.degraded += 1,
        }
    }
}

/// Socket lookup key: (node name, socket identifier)
type SocketKey<'a> = (&'a str, &'a str);

/// Translates the host's active material into a [`PortableDocument`]
pub struct Collector {
    registry: HandlerRegistry,
    boundary: FaultBoundary,
}

impl Collector {
    /// Create a collector dispatching to `registry`
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            boundary: FaultBoundary,
        }
    }

    /// Handler registry
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Mutable handler registry, for registering extra node types
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Collect the active material
    pub fn collect(&self, host: &dyn Host) -> PortableDocument {
        self.collect_with_stats(host).0
    }

    /// Collect the active material and report what happened per node
    pub fn collect_with_stats(&self, host: &dyn Host) -> (PortableDocument, CollectStats) {
        let mut stats = CollectStats::default();

        let Some(material) = host.active_material() else {
            tracing::debug!("No active material, sending empty document");
            return (PortableDocument::new(), stats);
        };

        let ctx = HandlerContext { host, material };
        let nodes = material.nodes();
        let live_links: Vec<&dyn HostLink> = material
            .links()
            .into_iter()
            .filter(|link| !link.is_muted())
            .collect();

        let driven: HashSet<SocketKey<'_>> = live_links
            .iter()
            .map(|link| (link.to_node(), link.to_socket()))
            .collect();

        let mut doc = PortableDocument::new();
        let mut ids: HashMap<&str, String> = HashMap::with_capacity(nodes.len());
        let mut input_names: HashMap<SocketKey<'_>, &str> = HashMap::new();
        let mut output_names: HashMap<SocketKey<'_>, &str> = HashMap::new();

        for (index, node) in nodes.iter().copied().enumerate() {
            let id = make_node_id(node.name(), index);

            for socket in node.inputs() {
                input_names.insert((node.name(), socket.identifier()), socket.name());
            }
            for socket in node.outputs() {
                output_names.insert((node.name(), socket.identifier()), socket.name());
            }

            let (portable, outcome) = self.collect_node(&id, node, &driven, &ctx);
            stats.record(&outcome);
            doc.nodes.push(portable);

            if ids.insert(node.name(), id).is_some() {
                tracing::warn!("Duplicate node name {:?}, links resolve to the last one", node.name());
            }
        }

        for link in live_links {
            let (Some(from_id), Some(to_id)) = (ids.get(link.from_node()), ids.get(link.to_node())) else {
                tracing::warn!(
                    "Dropping link {}.{} -> {}.{}: unknown node",
                    link.from_node(),
                    link.from_socket(),
                    link.to_node(),
                    link.to_socket()
                );
                stats.dropped_links += 1;
                continue;
            };

            let from_socket = output_names
                .get(&(link.from_node(), link.from_socket()))
                .copied()
                .unwrap_or(link.from_socket());
            let to_socket = input_names
                .get(&(link.to_node(), link.to_socket()))
                .copied()
                .unwrap_or(link.to_socket());

            doc.links
                .push(PortableLink::new(from_id.clone(), from_socket, to_id.clone(), to_socket));
        }

        stats.nodes = doc.nodes.len();
        stats.links = doc.links.len();
        tracing::debug!(
            "Collected material {:?}: {} nodes, {} links ({} handled, {} generic, {} degraded, {} links dropped)",
            material.name(),
            stats.nodes,
            stats.links,
            stats.handled,
            stats.unhandled,
            stats.degraded,
            stats.dropped_links
        );

        (doc, stats)
    }

    /// Translate one node: generic fields, socket defaults, then its handler
    fn collect_node(
        &self,
        id: &str,
        node: &dyn HostNode,
        driven: &HashSet<SocketKey<'_>>,
        ctx: &HandlerContext<'_>,
    ) -> (PortableNode, HandlerOutcome) {
        let inputs: Vec<_> = node.inputs().into_iter().filter(|s| s.is_enabled()).collect();
        let outputs: Vec<_> = node.outputs().into_iter().filter(|s| s.is_enabled()).collect();

        let mut info = NodeInfo::new(class_name_for(node.type_id()));
        info.set_inputs(inputs.iter().map(|s| s.name()));
        info.set_outputs(outputs.iter().map(|s| s.name()));

        // Unconnected inputs carry their literal value so the consumer never
        // sees a dangling socket
        let mut params = ParamMap::new();
        for socket in &inputs {
            if driven.contains(&(node.name(), socket.identifier())) {
                continue;
            }
            let Some(value) = socket.default_value().as_ref().and_then(ParamValue::from_host) else {
                continue;
            };
            params.entry(socket_param_key(socket.name())).or_insert(value);
        }

        let outcome = match self.registry.get(node.type_id()) {
            Some(handler) => self.boundary.run(id, handler, node, &mut info, &mut params, ctx),
            None => HandlerOutcome::Skipped,
        };

        (PortableNode::new(id, node.location(), info, params), outcome)
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(builtin_registry())
    }
}

/// Collect the host's active material with the built-in handlers
pub fn collect_material_data(host: &dyn Host) -> PortableDocument {
    Collector::default().collect(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{HandlerError, NodeHandler};
    use crate::host::{HostValue, MemoryHost, MemoryLink, MemoryMaterial, MemoryNode, MemorySocket};
    use serde_json::json;

    fn noise_node() -> MemoryNode {
        MemoryNode::new("White Noise Texture", "ShaderNodeTexWhiteNoise")
            .at(-400.0, 200.0)
            .with_input(MemorySocket::new("Vector").with_default([0.0, 0.0, 0.0]))
            .with_input(MemorySocket::new("W").with_default(0.0).disabled())
            .with_output(MemorySocket::new("Value"))
            .with_output(MemorySocket::new("Color"))
            .with_property("noise_dimensions", "2D")
    }

    fn ramp_node() -> MemoryNode {
        MemoryNode::new("Color Ramp", "ShaderNodeValToRGB")
            .at(-150.0, 200.0)
            .with_input(MemorySocket::new("Fac").with_default(0.5))
            .with_output(MemorySocket::new("Color"))
            .with_output(MemorySocket::new("Alpha"))
            .with_property(
                "color_ramp",
                HostValue::object([
                    ("interpolation", HostValue::from("EASE")),
                    (
                        "elements",
                        HostValue::List(vec![
                            HostValue::object([
                                ("position", HostValue::Float(0.0)),
                                ("color", HostValue::from([0.0, 0.0, 0.0, 1.0])),
                            ]),
                            HostValue::object([
                                ("position", HostValue::Float(1.0)),
                                ("color", HostValue::from([1.0, 1.0, 1.0, 1.0])),
                            ]),
                        ]),
                    ),
                ]),
            )
    }

    fn bsdf_node() -> MemoryNode {
        MemoryNode::new("Principled BSDF", "ShaderNodeBsdfPrincipled")
            .with_input(MemorySocket::new("Base Color").with_default([0.8, 0.8, 0.8, 1.0]))
            .with_input(MemorySocket::new("Roughness").with_default(0.5))
            .with_input(MemorySocket::new("Normal"))
            .with_output(MemorySocket::new("BSDF"))
    }

    fn material() -> MemoryMaterial {
        MemoryMaterial::new("Bark")
            .with_node(noise_node())
            .with_node(ramp_node())
            .with_node(bsdf_node())
            .link("White Noise Texture", "Value", "Color Ramp", "Fac")
            .link("Color Ramp", "Color", "Principled BSDF", "Base Color")
    }

    #[test]
    fn test_no_active_material_is_empty_document() {
        let doc = collect_material_data(&MemoryHost::new());
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"nodes": [], "links": []}));
    }

    #[test]
    fn test_empty_graph_is_empty_document() {
        let host = MemoryHost::new().with_material(MemoryMaterial::new("Empty"));
        let doc = collect_material_data(&host);
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"nodes": [], "links": []}));
    }

    #[test]
    fn test_collects_nodes_and_links() {
        let host = MemoryHost::new().with_material(material());
        let (doc, stats) = Collector::default().collect_with_stats(&host);

        let ids: Vec<_> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["White_Noise_Texture_000", "Color_Ramp_001", "Principled_BSDF_002"]);

        let noise = doc.node("White_Noise_Texture_000").unwrap();
        assert_eq!(noise.class, "TexWhiteNoiseModule");
        assert_eq!(noise.position, [-400.0, 200.0]);
        assert_eq!(noise.inputs, vec!["Vector"]);
        assert_eq!(noise.outputs, vec!["Value", "Color"]);
        assert_eq!(
            serde_json::to_value(&noise.params).unwrap(),
            json!({"vector": [0.0, 0.0, 0.0], "dimensions": 1})
        );

        // Fac is driven by the noise, so no literal is exported for it
        let ramp = doc.node("Color_Ramp_001").unwrap();
        assert_eq!(ramp.class, "ColorRampModule");
        assert!(ramp.param("fac").is_none());
        assert_eq!(ramp.param("mode"), Some(&ParamValue::from("LINEAR")));

        let bsdf = doc.node("Principled_BSDF_002").unwrap();
        assert_eq!(bsdf.class, "BsdfPrincipledModule");
        assert!(bsdf.param("base_color").is_none());
        assert_eq!(bsdf.param("roughness"), Some(&ParamValue::Float(0.5)));
        assert!(bsdf.param("normal").is_none());

        assert_eq!(
            doc.links,
            vec![
                PortableLink::new("White_Noise_Texture_000", "Value", "Color_Ramp_001", "Fac"),
                PortableLink::new("Color_Ramp_001", "Color", "Principled_BSDF_002", "Base Color"),
            ]
        );

        assert_eq!(
            stats,
            CollectStats {
                nodes: 3,
                links: 2,
                handled: 2,
                unhandled: 1,
                degraded: 0,
                dropped_links: 0,
            }
        );
    }

    #[test]
    fn test_unconnected_defaults_present_when_not_linked() {
        let host = MemoryHost::new().with_material(MemoryMaterial::new("Solo").with_node(ramp_node()));
        let doc = collect_material_data(&host);
        let ramp = &doc.nodes[0];
        assert_eq!(ramp.param("fac"), Some(&ParamValue::Float(0.5)));
        assert!(ramp.param("stops").is_some());
    }

    #[test]
    fn test_muted_and_dangling_links() {
        let material = material()
            .with_link(MemoryLink::new("White Noise Texture", "Color", "Principled BSDF", "Roughness").muted())
            .link("Ghost", "Color", "Principled BSDF", "Normal");
        let host = MemoryHost::new().with_material(material);
        let (doc, stats) = Collector::default().collect_with_stats(&host);

        assert_eq!(doc.links.len(), 2);
        assert_eq!(stats.dropped_links, 1);
        // A muted link does not drive its socket
        let bsdf = doc.node("Principled_BSDF_002").unwrap();
        assert_eq!(bsdf.param("roughness"), Some(&ParamValue::Float(0.5)));
    }

    #[test]
    fn test_links_use_socket_names() {
        let material = MemoryMaterial::new("Mix")
            .with_node(
                MemoryNode::new("Value", "ShaderNodeValue")
                    .with_output(MemorySocket::new("Value").with_identifier("Value_Out")),
            )
            .with_node(
                MemoryNode::new("Mix", "ShaderNodeMix")
                    .with_input(MemorySocket::new("A").with_identifier("A_Float").with_default(0.0))
                    .with_input(MemorySocket::new("A").with_identifier("A_Color").disabled()),
            )
            .link("Value", "Value_Out", "Mix", "A_Float");
        let doc = collect_material_data(&MemoryHost::new().with_material(material));

        assert_eq!(doc.links, vec![PortableLink::new("Value_000", "Value", "Mix_001", "A")]);
        let mix = doc.node("Mix_001").unwrap();
        assert_eq!(mix.inputs, vec!["A"]);
        assert!(mix.param("a").is_none());
    }

    #[test]
    fn test_failing_handler_is_isolated() {
        fn broken(
            _node: &dyn HostNode,
            info: &mut NodeInfo,
            _params: &mut ParamMap,
            _ctx: &HandlerContext<'_>,
        ) -> Result<(), HandlerError> {
            info.class = "Broken".to_string();
            Err(HandlerError::Custom("unreadable".to_string()))
        }

        let mut collector = Collector::default();
        collector.registry_mut().register("ShaderNodeBsdfPrincipled", broken);
        assert!(collector.registry().get("ShaderNodeBsdfPrincipled").is_some());

        let host = MemoryHost::new().with_material(material());
        let (doc, stats) = collector.collect_with_stats(&host);

        assert_eq!(stats.degraded, 1);
        assert_eq!(doc.nodes.len(), 3);
        let bsdf = doc.node("Principled_BSDF_002").unwrap();
        assert_eq!(bsdf.class, "BsdfPrincipledModule");
        assert_eq!(bsdf.param("roughness"), Some(&ParamValue::Float(0.5)));
        // The rest of the document is untouched
        assert_eq!(doc.node("Color_Ramp_001").unwrap().class, "ColorRampModule");
        assert_eq!(doc.links.len(), 2);
    }

    #[test]
    fn test_ids_unique_for_duplicate_sanitized_names() {
        let mut material = MemoryMaterial::new("Many");
        for name in ["Mix.001", "Mix 001", "Mix_001", "Mix!001"] {
            material = material.with_node(MemoryNode::new(name, "ShaderNodeMix"));
        }
        for i in 0..1200 {
            material = material.with_node(MemoryNode::new(format!("Node{i}"), "ShaderNodeMath"));
        }

        let doc = collect_material_data(&MemoryHost::new().with_material(material));
        let unique: HashSet<_> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(unique.len(), doc.nodes.len());
        assert_eq!(doc.nodes[1].id, "Mix_001_001");
        assert_eq!(doc.nodes[1003].id, "Node999_1003");
    }

    #[test]
    fn test_handler_keys_win_over_socket_defaults() {
        struct ModeWriter;
        impl NodeHandler for ModeWriter {
            fn handle(
                &self,
                _node: &dyn HostNode,
                _info: &mut NodeInfo,
                params: &mut ParamMap,
                _ctx: &HandlerContext<'_>,
            ) -> Result<(), HandlerError> {
                params.insert("mode".to_string(), ParamValue::Int(7));
                Ok(())
            }
        }

        let mut collector = Collector::new(HandlerRegistry::new());
        collector.registry_mut().register("ShaderNodeCustom", ModeWriter);

        let node = MemoryNode::new("Custom", "ShaderNodeCustom")
            .with_input(MemorySocket::new("Mode").with_default("A"));
        let doc = collector.collect(&MemoryHost::new().with_material(MemoryMaterial::new("M").with_node(node)));
        assert_eq!(doc.nodes[0].param("mode"), Some(&ParamValue::Int(7)));
    }
}

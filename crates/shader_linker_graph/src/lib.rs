// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node graph translation for the shader linker bridge.
//!
//! This crate turns the host application's active material node graph into
//! a portable, engine-agnostic JSON document:
//!
//! ```text
//! { "nodes": [{ "id", "class", "position", "inputs", "outputs", "params" }, ...],
//!   "links": [{ "from_node", "from_socket", "to_node", "to_socket" }, ...] }
//! ```
//!
//! ## Architecture
//!
//! - [`host`]: read-only traits over the host graph, plus an in-memory model
//! - [`ident`] / [`type_map`]: node ids and portable class names
//! - [`handlers`]: per-node-type parameter translators and their registry
//! - [`fault`]: per-node fault isolation
//! - [`collector`]: walks the graph and assembles the [`PortableDocument`]

pub mod collector;
pub mod document;
pub mod fault;
pub mod handlers;
pub mod host;
pub mod ident;
pub mod link;
pub mod node;
pub mod probe;
pub mod type_map;
pub mod value;

pub use collector::{collect_material_data, CollectStats, Collector};
pub use document::PortableDocument;
pub use fault::{FaultBoundary, HandlerOutcome};
pub use handlers::{builtin_registry, HandlerContext, HandlerError, HandlerRegistry, NodeHandler};
pub use host::{Host, HostLink, HostMaterial, HostNode, HostSocket, HostValue, MemoryHost, PropertySource};
pub use ident::{make_node_id, sanitize};
pub use link::PortableLink;
pub use node::{NodeInfo, PortableNode};
pub use type_map::class_name_for;
pub use value::{ParamMap, ParamValue};

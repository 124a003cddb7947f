// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions for the portable document.

use serde::{Deserialize, Serialize};

/// A link between two portable node sockets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableLink {
    /// Source node id
    pub from_node: String,
    /// Source socket name
    pub from_socket: String,
    /// Target node id
    pub to_node: String,
    /// Target socket name
    pub to_socket: String,
}

impl PortableLink {
    /// Create a new link
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
        }
    }
}
